use crate::fetcher::{FetchError, Fetcher};
use crate::marketplace::Marketplace;
use crate::models::ScrapeOutcome;
use crate::parser::{ListingExtractor, SelectorError};

/// Fragment the marketplaces embed in their anti-bot challenge pages.
pub const CAPTCHA_MARKER: &str = "captcha-widget";

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no query provided")]
    EmptyQuery,

    #[error("failed to scrape {marketplace}: {source}")]
    Fetch {
        marketplace: Marketplace,
        #[source]
        source: FetchError,
    },
}

/// Routes a search to the right marketplace page and extractor.
pub struct Dispatcher<F> {
    fetcher: F,
    emag: ListingExtractor,
    ebay: ListingExtractor,
}

impl<F: Fetcher> Dispatcher<F> {
    pub fn new(fetcher: F) -> Result<Self, SelectorError> {
        Ok(Self {
            fetcher,
            emag: ListingExtractor::new(Marketplace::Emag.selectors())?,
            ebay: ListingExtractor::new(Marketplace::Ebay.selectors())?,
        })
    }

    pub fn extractor(&self, marketplace: Marketplace) -> &ListingExtractor {
        match marketplace {
            Marketplace::Emag => &self.emag,
            Marketplace::Ebay => &self.ebay,
        }
    }

    pub fn search(&self, marketplace: Marketplace, query: &str) -> Result<ScrapeOutcome, DispatchError> {
        Ok(self.process_html(marketplace, &self.fetch_page(marketplace, query)?))
    }

    /// Fetches the raw search page without interpreting it.
    pub fn fetch_page(&self, marketplace: Marketplace, query: &str) -> Result<String, DispatchError> {
        if query.trim().is_empty() {
            return Err(DispatchError::EmptyQuery);
        }

        let target_url = marketplace.search_url(query);
        self.fetcher.fetch(&target_url).map_err(|source| {
            tracing::error!(%marketplace, error = %source, "scraping failed");
            DispatchError::Fetch { marketplace, source }
        })
    }

    pub fn process_html(&self, marketplace: Marketplace, html: &str) -> ScrapeOutcome {
        if html.contains(CAPTCHA_MARKER) {
            tracing::warn!(%marketplace, "marketplace answered with a captcha");
            return ScrapeOutcome::Captcha;
        }

        let products = self.extractor(marketplace).extract(html);
        tracing::info!(%marketplace, count = products.len(), "extracted products");
        ScrapeOutcome::Products(products)
    }
}
