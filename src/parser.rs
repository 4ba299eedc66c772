use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::marketplace::SiteSelectors;
use crate::models::{NO_LINK, NO_NAME, NO_PRICE, ProductRecord};

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("float pattern is valid")
});

#[derive(Debug, thiserror::Error)]
#[error("invalid {field} selector '{selector}': {message}")]
pub struct SelectorError {
    pub field: &'static str,
    pub selector: &'static str,
    pub message: String,
}

/// Compiled form of a [`SiteSelectors`] record.
///
/// Construction is the only fallible step; extraction itself never fails and
/// degrades to sentinels or an empty result on odd markup.
#[derive(Debug)]
pub struct ListingExtractor {
    listing: Selector,
    name: Selector,
    price: Selector,
    link: Selector,
    rating: Selector,
    reviews: Selector,
}

impl ListingExtractor {
    pub fn new(selectors: &SiteSelectors) -> Result<Self, SelectorError> {
        Ok(Self {
            listing: compile("listing", selectors.listing)?,
            name: compile("name", selectors.name)?,
            price: compile("price", selectors.price)?,
            link: compile("link", selectors.link)?,
            rating: compile("rating", selectors.rating)?,
            reviews: compile("reviews", selectors.reviews)?,
        })
    }

    /// Pull every valid listing out of a search-results page, in document order.
    pub fn extract(&self, html: &str) -> Vec<ProductRecord> {
        let doc = Html::parse_document(html);
        let mut products = Vec::new();
        let mut dropped = 0usize;

        for (index, card) in doc.select(&self.listing).enumerate() {
            match self.extract_listing(card) {
                Some(record) => products.push(record),
                None => {
                    dropped += 1;
                    tracing::debug!(index, "dropping listing without name or price");
                }
            }
        }

        tracing::debug!(kept = products.len(), dropped, "extracted listings");
        products
    }

    fn extract_listing(&self, card: ElementRef<'_>) -> Option<ProductRecord> {
        let name = text_or(card, &self.name, NO_NAME);
        let price = text_or(card, &self.price, NO_PRICE);
        if name == NO_NAME || price == NO_PRICE {
            return None;
        }

        let link = card
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .filter(|href| !href.is_empty())
            .unwrap_or(NO_LINK)
            .to_string();

        Some(ProductRecord {
            name,
            price,
            link,
            total_reviews: parse_review_count(&collect_text(card, &self.reviews)),
            rating: parse_rating(&collect_text(card, &self.rating)),
        })
    }
}

fn compile(field: &'static str, selector: &'static str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError {
        field,
        selector,
        message: e.to_string(),
    })
}

/// Text of every match inside `card`, concatenated and trimmed.
fn collect_text(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn text_or(card: ElementRef<'_>, selector: &Selector, sentinel: &str) -> String {
    let text = collect_text(card, selector);
    if text.is_empty() {
        sentinel.to_string()
    } else {
        text
    }
}

/// First run of digits in free-form review text, e.g. "(1.234 review-uri)" -> 1.
///
/// A run too long for `u64` saturates.
pub fn parse_review_count(text: &str) -> u64 {
    DIGIT_RUN
        .find(text)
        .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Leading numeric token of the rating text, e.g. "4.5 out of 5 stars" -> 4.5.
pub fn parse_rating(text: &str) -> f64 {
    LEADING_FLOAT
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|rating| rating.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::{EBAY_SELECTORS, EMAG_SELECTORS};
    use proptest::prelude::*;

    fn emag() -> ListingExtractor {
        ListingExtractor::new(&EMAG_SELECTORS).unwrap()
    }

    fn ebay() -> ListingExtractor {
        ListingExtractor::new(&EBAY_SELECTORS).unwrap()
    }

    const EMAG_PAGE: &str = r#"
        <html><body><div class="card-collection">
          <div class="card-item">
            <a href="https://www.emag.ro/laptop-a/pd/A1/">
              <h2 class="card-v2-title"> Laptop Alpha 15" </h2>
            </a>
            <div class="card-v2-rating">
              <span class="average-rating">4.67</span>
              <span class="star-rating-text">(128 review-uri)</span>
            </div>
            <p class="product-new-price">3.299<sup>99</sup> <span>Lei</span></p>
          </div>
          <div class="card-item">
            <a href="https://www.emag.ro/laptop-b/pd/B2/">
              <h2 class="card-v2-title">Laptop Beta</h2>
            </a>
          </div>
          <div class="card-item">
            <h2 class="card-v2-title">Laptop Gamma</h2>
            <p class="product-new-price">1.999,00 Lei</p>
          </div>
        </div></body></html>
    "#;

    const EBAY_PAGE: &str = r#"
        <ul class="srp-results">
          <li class="s-item">
            <a class="s-item__link" href="https://www.ebay.com/itm/111">
              <div class="s-item__title"><span>Shop on eBay</span></div>
            </a>
            <span class="s-item__price">$20.00</span>
          </li>
          <li class="s-item">
            <a class="s-item__link" href="https://www.ebay.com/itm/222">
              <div class="s-item__title">Mechanical Keyboard</div>
            </a>
            <div class="x-star-rating"><span class="clipped">4.5 out of 5 stars.</span></div>
            <span class="s-item__reviews">37 product ratings - Mechanical Keyboard</span>
            <span class="s-item__price">$59.99</span>
          </li>
          <li class="s-item">
            <div class="s-item__title">Keyboard Without Price</div>
          </li>
        </ul>
    "#;

    #[test]
    fn test_emag_extracts_valid_cards_in_order() {
        let products = emag().extract(EMAG_PAGE);
        assert_eq!(products.len(), 2);

        assert_eq!(products[0].name, "Laptop Alpha 15\"");
        assert_eq!(products[0].price, "3.29999 Lei");
        assert_eq!(products[0].link, "https://www.emag.ro/laptop-a/pd/A1/");
        assert_eq!(products[0].rating, 4.67);
        assert_eq!(products[0].total_reviews, 128);

        assert_eq!(products[1].name, "Laptop Gamma");
        assert_eq!(products[1].price, "1.999,00 Lei");
    }

    #[test]
    fn test_missing_link_keeps_record() {
        let products = emag().extract(EMAG_PAGE);
        assert_eq!(products[1].link, NO_LINK);
        assert_eq!(products[1].rating, 0.0);
        assert_eq!(products[1].total_reviews, 0);
    }

    #[test]
    fn test_ebay_extracts_ratings_and_reviews() {
        let products = ebay().extract(EBAY_PAGE);
        assert_eq!(products.len(), 2);

        assert_eq!(products[0].name, "Shop on eBay");
        assert_eq!(products[0].link, "https://www.ebay.com/itm/111");

        let keyboard = &products[1];
        assert_eq!(keyboard.name, "Mechanical Keyboard");
        assert_eq!(keyboard.price, "$59.99");
        assert_eq!(keyboard.link, "https://www.ebay.com/itm/222");
        assert_eq!(keyboard.rating, 4.5);
        assert_eq!(keyboard.total_reviews, 37);
    }

    #[test]
    fn test_selectors_are_marketplace_specific() {
        assert!(ebay().extract(EMAG_PAGE).is_empty());
        assert!(emag().extract(EBAY_PAGE).is_empty());
    }

    #[test]
    fn test_three_listings_one_without_price() {
        let html = r#"
            <div class="s-item"><span class="s-item__title">First</span><span class="s-item__price">$1</span></div>
            <div class="s-item"><span class="s-item__title">Second</span></div>
            <div class="s-item"><span class="s-item__title">Third</span><span class="s-item__price">$3</span></div>
        "#;
        let names: Vec<_> = ebay().extract(html).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["First", "Third"]);
    }

    #[test]
    fn test_whitespace_only_fields_count_as_missing() {
        let html = r#"
            <div class="card-item">
              <h2 class="card-v2-title">   </h2>
              <p class="product-new-price">10 Lei</p>
            </div>
        "#;
        assert!(emag().extract(html).is_empty());
    }

    #[test]
    fn test_empty_href_falls_back_to_sentinel() {
        let html = r#"
            <div class="card-item">
              <a href="">x</a>
              <h2 class="card-v2-title">Mouse</h2>
              <p class="product-new-price">10 Lei</p>
            </div>
        "#;
        let products = emag().extract(html);
        assert_eq!(products[0].link, NO_LINK);
    }

    #[test]
    fn test_empty_and_broken_documents() {
        assert!(emag().extract("").is_empty());
        assert!(ebay().extract("<li class=\"s-item\"><div class=\"s-item__title\">Open").is_empty());
        assert!(emag().extract("<<<>>> not html at all").is_empty());
    }

    #[test]
    fn test_review_count_takes_first_digit_run() {
        assert_eq!(parse_review_count("123 reviews (some text)"), 123);
        assert_eq!(parse_review_count("(1.234 review-uri)"), 1);
        assert_eq!(parse_review_count("no reviews yet"), 0);
        assert_eq!(parse_review_count(""), 0);
        assert_eq!(parse_review_count("99999999999999999999999 reviews"), u64::MAX);
        assert_eq!(parse_review_count("18446744073709551615"), u64::MAX);
    }

    #[test]
    fn test_rating_takes_leading_number() {
        assert_eq!(parse_rating("4.5 out of 5"), 4.5);
        assert_eq!(parse_rating("  3 stars"), 3.0);
        assert_eq!(parse_rating(".5"), 0.5);
        assert_eq!(parse_rating("-1.5x"), -1.5);
        assert_eq!(parse_rating("1e1 points"), 10.0);
        assert_eq!(parse_rating("rated 4.5"), 0.0);
        assert_eq!(parse_rating(""), 0.0);
        assert_eq!(parse_rating("1e999"), 0.0);
    }

    #[test]
    fn test_invalid_selector_is_rejected_at_construction() {
        let broken = SiteSelectors { listing: "div[", ..EMAG_SELECTORS };
        let err = ListingExtractor::new(&broken).unwrap_err();
        assert_eq!(err.field, "listing");
        assert_eq!(err.selector, "div[");
    }

    proptest! {
        #[test]
        fn prop_extract_never_panics(html in ".{0,400}") {
            let _ = emag().extract(&html);
            let _ = ebay().extract(&html);
        }

        #[test]
        fn prop_review_count_matches_first_digit_run(prefix in "[^0-9]{0,12}", n in 0u32..1_000_000, suffix in "[a-z ()]{0,12}") {
            let text = format!("{prefix}{n}{suffix}");
            prop_assert_eq!(parse_review_count(&text), u64::from(n));
        }

        #[test]
        fn prop_rating_without_leading_number_is_zero(text in "[a-zA-Z ]{0,20}") {
            prop_assert_eq!(parse_rating(&text), 0.0);
        }

        #[test]
        fn prop_valid_cards_keep_trimmed_text(name in "[A-Za-z][A-Za-z0-9 ]{0,20}", price in "[0-9]{1,5} Lei") {
            let html = format!(
                r#"<div class="card-item"><h2 class="card-v2-title">  {name}  </h2><p class="product-new-price"> {price} </p></div>"#
            );
            let products = emag().extract(&html);
            prop_assert_eq!(products.len(), 1);
            prop_assert_eq!(&products[0].name, name.trim());
            prop_assert_eq!(&products[0].price, &price);
        }
    }
}
