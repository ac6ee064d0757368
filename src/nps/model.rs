use std::fmt;

/// A national site as shown on its nps.gov detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationalSite {
    /// e.g. "National Park", some sites have a blank designation
    pub category: String,
    pub name: String,
    /// city and state, e.g. "Houghton, MI"
    pub address: String,
    /// e.g. "49931" or "82190-0168"
    pub zipcode: String,
    #[allow(dead_code)]
    pub phone: String,
    /// the detail page this site was scraped from, if known
    pub url: Option<String>,
}

impl NationalSite {
    pub fn with_url(self, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..self
        }
    }
}

impl fmt::Display for NationalSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {} {}", self.name, self.category, self.address, self.zipcode)
    }
}
