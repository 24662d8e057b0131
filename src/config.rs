//! Assistant configuration: store policies and engine limits.

use crate::error::AssistantError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the platform config/data dirs
const APP_DIR: &str = "storefront-assistant";

/// Default config file name
const CONFIG_FILE: &str = "assistant.json";

/// Default catalog file name for the in-memory adapter
const CATALOG_FILE: &str = "catalog.json";

/// A payment method the store accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub label: String,

    /// Whether this method can be paid in installments
    #[serde(default)]
    pub installments: bool,
}

impl PaymentMethod {
    pub fn new(label: &str, installments: bool) -> Self {
        Self {
            label: label.to_string(),
            installments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistantConfig {
    pub payment_methods: Vec<PaymentMethod>,

    /// Ways to get an order without direct shipping
    pub shipping_alternatives: Vec<String>,

    /// Maximum items returned by a product search
    pub search_limit: usize,

    /// Items scanned when summarizing the kinds of products in a category
    pub category_scan_limit: usize,

    /// Product kinds listed in a category summary
    pub type_summary_size: usize,

    /// Items included in the payload of a category summary
    pub category_sample_size: usize,

    /// Items handed to the phrasing collaborator
    pub phrasing_sample_size: usize,

    pub phrasing_timeout_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            payment_methods: vec![
                PaymentMethod::new("Efectivo", false),
                PaymentMethod::new("Transferencia bancaria", false),
                PaymentMethod::new("Mercado Pago", false),
                PaymentMethod::new("Tarjeta de débito", false),
                PaymentMethod::new("Tarjeta de crédito", true),
            ],
            shipping_alternatives: vec![
                "retiro en nuestro local".to_string(),
                "envío coordinado por tu cuenta con un cadete o servicio de mensajería".to_string(),
            ],
            search_limit: 20,
            category_scan_limit: 60,
            type_summary_size: 8,
            category_sample_size: 12,
            phrasing_sample_size: 5,
            phrasing_timeout_ms: 8000,
        }
    }
}

impl AssistantConfig {
    pub fn phrasing_timeout(&self) -> Duration {
        Duration::from_millis(self.phrasing_timeout_ms)
    }

    pub fn offers_installments(&self) -> bool {
        self.payment_methods.iter().any(|m| m.installments)
    }

    /// Load and parse a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, AssistantError> {
        if !path.exists() {
            return Err(AssistantError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| AssistantError::FileRead {
            kind: "config",
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| AssistantError::FileParse {
            kind: "config",
            message: e.to_string(),
        })
    }
}

/// `<config_dir>/storefront-assistant/assistant.json`
pub fn default_config_path() -> Result<PathBuf, AssistantError> {
    let dir = dirs::config_dir().ok_or(AssistantError::NoConfigDir)?;
    Ok(dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `<data_dir>/storefront-assistant/catalog.json`
pub fn default_catalog_path() -> Result<PathBuf, AssistantError> {
    let dir = dirs::data_dir().ok_or(AssistantError::NoConfigDir)?;
    Ok(dir.join(APP_DIR).join(CATALOG_FILE))
}
