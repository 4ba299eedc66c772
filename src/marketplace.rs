use std::fmt;

use serde::Serialize;

/// CSS selectors describing one marketplace's search-result markup.
///
/// `listing` matches a whole product card; the rest are resolved inside it.
#[derive(Debug, Clone, Copy)]
pub struct SiteSelectors {
    pub listing: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    /// The `href` of the first match is used.
    pub link: &'static str,
    pub rating: &'static str,
    pub reviews: &'static str,
}

pub const EMAG_SELECTORS: SiteSelectors = SiteSelectors {
    listing: ".card-item",
    name: ".card-v2-title",
    price: ".product-new-price",
    link: "a",
    rating: ".card-v2-rating .average-rating",
    reviews: ".card-v2-rating .star-rating-text",
};

pub const EBAY_SELECTORS: SiteSelectors = SiteSelectors {
    listing: ".s-item",
    name: ".s-item__title",
    price: ".s-item__price",
    link: ".s-item__link",
    rating: ".x-star-rating",
    reviews: ".s-item__reviews",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    Emag,
    Ebay,
}

impl Marketplace {
    pub fn selectors(self) -> &'static SiteSelectors {
        match self {
            Marketplace::Emag => &EMAG_SELECTORS,
            Marketplace::Ebay => &EBAY_SELECTORS,
        }
    }

    /// Search page on the marketplace itself, before proxy wrapping.
    pub fn search_url(self, query: &str) -> String {
        let encoded = urlencoding::encode(query);
        match self {
            Marketplace::Emag => format!("https://www.emag.ro/search/{}", encoded),
            Marketplace::Ebay => format!("https://www.ebay.com/sch/i.html?_nkw={}", encoded),
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marketplace::Emag => f.write_str("emag"),
            Marketplace::Ebay => f.write_str("ebay"),
        }
    }
}
