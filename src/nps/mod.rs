use std::collections::BTreeMap;
use color_eyre::eyre::bail;
use log::info;
use serde_json::Value;
use crate::cache::CachedFetcher;
use crate::http::Transport;
use crate::nps::model::NationalSite;
use crate::nps::page::{IndexPage, SiteDetailPage, StatePage};
use crate::utils::absolute_url;

mod page;
pub mod model;

#[cfg(test)]
pub use page::fixtures;

const HOME_PAGE_PATH: &str = "/index.htm";

/// state name (lower-cased) to state page URL
pub type StateIndex = BTreeMap<String, String>;

/// Scrapes nps.gov through the page cache
pub struct NpsCrawl<T> {
    transport: T,
    fetcher: CachedFetcher,
    base_url: String,
}

impl<T: Transport> NpsCrawl<T> {
    pub fn new(transport: T, fetcher: CachedFetcher, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// map every state listed on the home page to its state page
    #[tracing::instrument(skip(self))]
    pub async fn state_index(&self) -> color_eyre::Result<StateIndex> {
        let url = absolute_url(&self.base_url, HOME_PAGE_PATH);
        let html = self.fetch_page(&url).await?;
        let index_page = IndexPage::parse_html(&html, &self.base_url)?;
        Ok(
            index_page.states.into_iter()
                .map(|state| (state.name, state.url))
                .collect()
        )
    }

    /// every site listed on a state page, each one scraped from its own detail page
    #[tracing::instrument(skip(self))]
    pub async fn sites_for_state(&self, state_url: &str) -> color_eyre::Result<Vec<NationalSite>> {
        let html = self.fetch_page(state_url).await?;
        let state_page = StatePage::parse_html(&html, &self.base_url)?;

        let total = state_page.site_urls.len();
        let mut sites = Vec::with_capacity(total);
        for (idx, site_url) in state_page.site_urls.into_iter().enumerate() {
            info!("[{}/{total}] fetching site detail page [{}]...", idx + 1, site_url);
            let site = self.site_detail(&site_url).await?;
            sites.push(site);
        }
        Ok(sites)
    }

    /// scrape a single site detail page
    #[tracing::instrument(skip(self))]
    pub async fn site_detail(&self, site_url: &str) -> color_eyre::Result<NationalSite> {
        let html = self.fetch_page(site_url).await?;
        let detail_page = SiteDetailPage::parse_html(&html)?;
        Ok(NationalSite::from(detail_page).with_url(site_url))
    }

    /// get the content of a page, from the cache when possible
    async fn fetch_page(&self, url: &str) -> color_eyre::Result<String> {
        let value = self.fetcher.fetch(url, |url| async move {
            self.transport.get_text(&url).await.map(Value::String)
        }).await?;
        match value {
            Value::String(html) => Ok(html),
            other => bail!("cache entry for [{}] is not a page: {}", url, other),
        }
    }
}
