//! Static vocabulary: keyword lists, stopwords, synonyms and product nouns.
//!
//! All entries are written in canonical form (lowercase, no accents) and are
//! normalized again on load, so a stray accent here cannot break matching.

use crate::keywords::KeywordSet;
use crate::text::{normalize, to_plural, to_singular};
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

// ============================================================================
// Intent keyword lists
// ============================================================================

const PRODUCT_TERMS: &[&str] = &[
    "producto", "productos", "precio", "precios", "cuanto sale", "cuanto cuesta",
    "cuanto esta", "stock", "disponible", "oferta", "ofertas", "descuento", "promo",
    "liquidacion", "busco", "buscando", "tienen", "venden", "comprar", "categoria",
    "categorias", "catalogo", "talle", "talles", "modelo", "marca", "color",
];

const PAYMENT_TERMS: &[&str] = &[
    "pago", "pagos", "pagar", "pagan", "abonar", "tarjeta", "credito", "debito",
    "efectivo", "transferencia", "mercado pago", "mercadopago", "cuotas",
    "medios de pago", "factura",
];

const SHIPPING_TERMS: &[&str] = &[
    "envio", "envios", "enviar", "envian", "entrega", "entregas", "domicilio",
    "delivery", "retiro", "retirar", "correo", "despacho", "flete", "sucursal",
    "llega",
];

/// Looser shipping stems consulted only when nothing else classified the message
const SHIPPING_HINT_TERMS: &[&str] = &[
    "envi", "mandan", "mandar", "despach", "cadete", "moto", "llegar", "llevar",
    "encomienda", "comisionista", "uber",
];

const GREETING_TERMS: &[&str] = &[
    "hola", "buenas", "buen dia", "buenos dias", "buenas tardes", "buenas noches",
    "que tal", "saludos", "holis",
];

const OFFER_TERMS: &[&str] = &[
    "oferta", "ofertas", "descuento", "descuentos", "promo", "promocion",
    "liquidacion", "rebaja", "rebajas",
];

const STOCK_TERMS: &[&str] = &["stock", "disponible", "disponibles", "en existencia"];

// ============================================================================
// Word lists
// ============================================================================

const STOPWORDS: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "uno", "unos", "unas", "de", "del", "al",
    "en", "y", "o", "a", "con", "sin", "por", "para", "que", "como", "cual", "cuales",
    "donde", "cuando", "quien", "me", "mi", "mis", "tu", "tus", "su", "sus", "es",
    "son", "hay", "este", "esta", "estos", "estas", "ese", "esa", "eso", "esos",
    "esas", "muy", "mas", "pero", "sobre", "entre", "hasta", "desde", "tambien",
    "tengo", "tenes", "puedo", "pueden", "podes", "hola", "buenas", "buenos",
    "buen", "dia", "dias", "tardes", "noches", "gracias", "favor", "porfa",
    "queria", "ver", "tipo", "tipos", "clase", "clases", "todo", "todos", "todas",
    "ustedes", "vos", "usted", "nos", "les", "lo", "le", "se", "si", "no", "ya",
    "hacen", "hace", "tal", "saludos", "ahi", "aca", "hoy", "algun", "alguna",
    "algunos", "algunas", "otro", "otra", "otros", "otras", "cosa", "cosas",
];

/// Domain words that say "this is about products" without naming one
const IGNORE_WORDS: &[&str] = &[
    "producto", "productos", "stock", "oferta", "ofertas", "descuento", "descuentos",
    "promo", "promocion", "precio", "precios", "busco", "buscando", "buscar",
    "tienen", "tenian", "venden", "vender", "comprar", "quiero", "necesito",
    "disponible", "disponibles", "categoria", "categorias", "catalogo", "articulo",
    "articulos", "liquidacion", "barato", "baratos", "talle", "talles", "algo",
    "rebaja", "rebajas", "existencia", "cuanto", "sale", "cuesta", "mostrar",
    "mostrame", "listar",
];

const BRAND_NAMES: &[&str] = &[
    "nike", "adidas", "puma", "reebok", "topper", "fila", "converse", "vans",
    "samsung", "apple", "xiaomi", "motorola", "sony", "philips", "lenovo", "lego",
    "hasbro", "mattel", "funko", "disney", "marvel",
];

const PRODUCT_NOUNS: &[&str] = &[
    "remera", "camisa", "pantalon", "jean", "short", "pollera", "vestido", "buzo",
    "campera", "sweater", "zapatilla", "zapato", "bota", "sandalia", "gorra",
    "gorro", "bufanda", "mochila", "bolso", "cartera", "billetera", "cinturon",
    "media", "malla", "pijama", "juguete", "muneca", "peluche", "figura", "puzzle",
    "rompecabeza", "celular", "auricular", "cargador", "funda", "parlante", "taza",
    "vaso", "almohada", "sabana", "toalla", "lampara", "reloj", "anteojo", "perfume",
];

// ============================================================================
// Synonym tables
// ============================================================================

/// Informal, category-level token → canonical category name.
///
/// Product-type words (remera, celular) stay out of this table: they are
/// search terms, not category names.
const CATEGORY_SYNONYMS: &[(&str, &str)] = &[
    ("juguete", "juegos y coleccionables"),
    ("jugueteria", "juegos y coleccionables"),
    ("coleccion", "juegos y coleccionables"),
    ("coleccionable", "juegos y coleccionables"),
    ("figurita", "juegos y coleccionables"),
    ("ropa", "indumentaria"),
    ("vestimenta", "indumentaria"),
    ("prenda", "indumentaria"),
    ("zapateria", "calzado"),
    ("tecnologia", "electronica"),
    ("telefonia", "electronica"),
    ("gadget", "electronica"),
    ("cocina", "hogar"),
    ("deco", "hogar"),
    ("decoracion", "hogar"),
    ("bazar", "hogar"),
    ("mueble", "hogar"),
    ("complemento", "accesorios"),
    ("bijouterie", "accesorios"),
];

/// Canonical singular product word → alternate surface forms
const PRODUCT_SYNONYMS: &[(&str, &[&str])] = &[
    ("remera", &["camiseta", "playera", "polera", "franela", "t-shirt"]),
    ("buzo", &["sudadera", "hoodie", "canguro"]),
    ("campera", &["chaqueta", "chamarra", "casaca", "abrigo"]),
    ("pantalon", &["jean", "jogging", "calza"]),
    ("zapatilla", &["tenis", "deportiva", "sneaker"]),
    ("pollera", &["falda"]),
    ("gorra", &["cachucha", "jockey"]),
    ("mochila", &["morral"]),
    ("celular", &["telefono", "smartphone", "movil"]),
    ("auricular", &["audifono", "headphone", "cascos"]),
    ("muneca", &["barbie", "bebote"]),
    ("taza", &["jarro", "mug"]),
    ("anteojo", &["lente", "gafa"]),
];

// ============================================================================
// Loaded tables
// ============================================================================

fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| normalize(w)).collect()
}

/// Keys a singular entry is reachable under: itself and what the suffix rules
/// make of its plural ("juguete" → "juguetes" → "juguet").
fn lookup_keys(word: &str) -> [String; 2] {
    let word = normalize(word);
    let folded = to_singular(&to_plural(&word));
    [word, folded]
}

lazy_static! {
    pub static ref PRODUCT_KEYWORDS: KeywordSet = KeywordSet::new("products", PRODUCT_TERMS);
    pub static ref PAYMENT_KEYWORDS: KeywordSet = KeywordSet::new("payments", PAYMENT_TERMS);
    pub static ref SHIPPING_KEYWORDS: KeywordSet = KeywordSet::new("shipping", SHIPPING_TERMS);
    pub static ref SHIPPING_HINTS: KeywordSet = KeywordSet::new("shipping-hints", SHIPPING_HINT_TERMS);
    pub static ref GREETINGS: KeywordSet = KeywordSet::new("greetings", GREETING_TERMS);
    pub static ref OFFER_MARKERS: KeywordSet = KeywordSet::new("offer", OFFER_TERMS);
    pub static ref STOCK_MARKERS: KeywordSet = KeywordSet::new("stock", STOCK_TERMS);

    pub static ref STOPWORD_SET: HashSet<String> = word_set(STOPWORDS);
    pub static ref IGNORE_SET: HashSet<String> = word_set(IGNORE_WORDS);
    pub static ref BRAND_SET: HashSet<String> = word_set(BRAND_NAMES);

    pub static ref CATEGORY_SYNONYM_TABLE: HashMap<String, String> = {
        let mut table = HashMap::new();
        for (token, category) in CATEGORY_SYNONYMS {
            for key in lookup_keys(token) {
                table.insert(key, normalize(category));
            }
        }
        table
    };

    pub static ref PRODUCT_SYNONYM_TABLE: HashMap<String, Vec<String>> = {
        let mut table = HashMap::new();
        for (word, alternates) in PRODUCT_SYNONYMS {
            let alternates: Vec<String> = alternates.iter().map(|a| normalize(a)).collect();
            for key in lookup_keys(word) {
                table.insert(key, alternates.clone());
            }
        }
        table
    };

    /// Product nouns plus every word the product-type synonym table knows
    pub static ref PRODUCT_NOUN_SET: HashSet<String> = {
        let mut nouns = HashSet::new();
        let synonyms = PRODUCT_SYNONYMS
            .iter()
            .flat_map(|(word, alternates)| std::iter::once(*word).chain(alternates.iter().copied()));
        for noun in PRODUCT_NOUNS.iter().copied().chain(synonyms) {
            nouns.extend(lookup_keys(noun));
        }
        nouns
    };
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

pub fn is_ignore_word(word: &str) -> bool {
    IGNORE_SET.contains(word)
}

pub fn is_brand(word: &str) -> bool {
    BRAND_SET.contains(word)
}

/// Checks an already-normalized token as written and in singular form.
pub fn is_product_noun(token: &str) -> bool {
    PRODUCT_NOUN_SET.contains(token) || PRODUCT_NOUN_SET.contains(&to_singular(token))
}
