use std::fmt;
use color_eyre::eyre::{bail, eyre};
use serde::Deserialize;
use serde_json::Value;
use crate::cache::CachedFetcher;
use crate::http::Transport;
use crate::nps::model::NationalSite;

/// search radius around the site's zip code, in miles
const SEARCH_RADIUS: u32 = 10;
const MAX_MATCHES: u32 = 10;

/// How to read one display field out of a search result.
///
/// Candidates are JSON pointers tried in order; the first non-blank string wins,
/// otherwise the fallback is used.
struct FieldRule {
    candidates: &'static [&'static str],
    fallback: &'static str,
}

const CATEGORY_RULE: FieldRule = FieldRule {
    candidates: &["/fields/group_sic_code_name", "/fields/group_sic_code_name_ext"],
    fallback: "no category",
};

const STREET_ADDRESS_RULE: FieldRule = FieldRule {
    candidates: &["/fields/address"],
    fallback: "no address",
};

const CITY_RULE: FieldRule = FieldRule {
    candidates: &["/fields/city"],
    fallback: "no city",
};

impl FieldRule {
    fn extract(&self, entry: &Value) -> String {
        self.candidates.iter()
            .filter_map(|pointer| entry.pointer(pointer))
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(self.fallback)
            .to_string()
    }
}

/// A point of interest returned by the radius search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyPlace {
    pub name: String,
    pub category: String,
    pub street_address: String,
    pub city_name: String,
}

impl NearbyPlace {
    /// flatten one `searchResults` entry, only `name` is mandatory
    fn from_entry(entry: &Value) -> color_eyre::Result<Self> {
        let name = entry.get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| eyre!("search result without a name: {}", entry))?;
        Ok(
            Self {
                name: name.trim().to_string(),
                category: CATEGORY_RULE.extract(entry),
                street_address: STREET_ADDRESS_RULE.extract(entry),
                city_name: CITY_RULE.extract(entry),
            }
        )
    }
}

impl fmt::Display for NearbyPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}, {}", self.name, self.category, self.street_address, self.city_name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RadiusResponse {
    /// absent when nothing was found
    #[serde(default)]
    search_results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    info: Option<StatusInfo>,
}

#[derive(Debug, Deserialize)]
struct StatusInfo {
    #[serde(default)]
    statuscode: i64,
    #[serde(default)]
    messages: Vec<String>,
}

/// flatten a radius search response into places, in response order
pub fn nearby_places_from_response(response: &Value) -> color_eyre::Result<Vec<NearbyPlace>> {
    let response = RadiusResponse::deserialize(response)?;
    response.search_results.iter()
        .map(NearbyPlace::from_entry)
        .collect()
}

/// MapQuest radius search, cached by site name
pub struct PlacesClient<T> {
    transport: T,
    fetcher: CachedFetcher,
    api_key: String,
    radius_url: String,
}

impl<T: Transport> PlacesClient<T> {
    pub fn new(transport: T, fetcher: CachedFetcher, api_key: impl Into<String>, radius_url: impl Into<String>) -> Self {
        Self {
            transport,
            fetcher,
            api_key: api_key.into(),
            radius_url: radius_url.into(),
        }
    }

    #[tracing::instrument(skip(self, site), fields(site = %site.name))]
    pub async fn nearby_places(&self, site: &NationalSite) -> color_eyre::Result<Vec<NearbyPlace>> {
        let response = self.fetcher.fetch(&site.name, |_| self.search(site)).await?;
        nearby_places_from_response(&response)
    }

    fn query(&self, site: &NationalSite) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.api_key.clone()),
            ("origin", site.zipcode.clone()),
            ("radius", SEARCH_RADIUS.to_string()),
            ("maxMatches", MAX_MATCHES.to_string()),
            ("ambiguities", "ignore".to_string()),
            ("outFormat", "json".to_string()),
        ]
    }

    async fn search(&self, site: &NationalSite) -> color_eyre::Result<Value> {
        let response = self.transport.get_json(&self.radius_url, &self.query(site)).await?;
        check_status(&response)?;
        Ok(response)
    }
}

/// refuse API error envelopes so they never land in the cache
fn check_status(response: &Value) -> color_eyre::Result<()> {
    let envelope = StatusEnvelope::deserialize(response)?;
    match envelope.info {
        Some(info) if info.statuscode != 0 => {
            bail!("places API returned status {}: {}", info.statuscode, info.messages.join("; "))
        }
        _ => Ok(()),
    }
}
