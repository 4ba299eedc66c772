use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::marketplace::Marketplace;

pub const NO_NAME: &str = "No name";
pub const NO_PRICE: &str = "No price";
pub const NO_LINK: &str = "No link";

/// One product listing pulled from a search-results page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    /// Price exactly as displayed, currency and separators included.
    pub price: String,
    pub link: String,
    pub total_reviews: u64,
    pub rating: f64,
}

/// What a search produced once the page came back from the proxy.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    Products(Vec<ProductRecord>),
    /// The marketplace answered with an anti-bot challenge.
    Captcha,
}

// Products serialize as a bare array, a challenge as `{"captcha": true}`.
impl Serialize for ScrapeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScrapeOutcome::Products(products) => products.serialize(serializer),
            ScrapeOutcome::Captcha => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("captcha", &true)?;
                map.end()
            }
        }
    }
}

#[derive(Serialize)]
pub struct SearchArchive {
    pub marketplace: Marketplace,
    pub query: String,
    pub fetched_at: String,
    pub outcome: ScrapeOutcome,
}

impl SearchArchive {
    pub fn new(marketplace: Marketplace, query: &str, outcome: ScrapeOutcome) -> Self {
        Self {
            marketplace,
            query: query.to_string(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
            outcome,
        }
    }
}
