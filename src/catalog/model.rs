use serde::{Deserialize, Serialize};

/// A product row as exposed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: i64,
    pub product_code: Option<String>,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Vector search hit with its cosine distance.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProduct {
    pub product: CatalogProduct,
    pub distance: f64,
}

impl ScoredProduct {
    #[inline]
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}

/// A row whose embedding has not been computed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEmbedding {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Fields of a product to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    pub product_code: Option<String>,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            product_code: None,
            name: name.into(),
            price,
            description: None,
            image_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.product_code = Some(code.into());
        self
    }
}
