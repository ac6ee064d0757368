use std::path::PathBuf;
use color_eyre::eyre::eyre;

const DEFAULT_CACHE_FILE: &str = "nps_cache.json";
const DEFAULT_NPS_BASE_URL: &str = "https://www.nps.gov";
const DEFAULT_RADIUS_URL: &str = "http://www.mapquestapi.com/search/v2/radius";

/// Runtime configuration, read from the environment (and `.env` if present)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub cache_file: PathBuf,
    pub nps_base_url: String,
    pub radius_url: String,
}

impl Config {
    pub fn from_env() -> color_eyre::Result<Self> {
        // a missing .env is fine, the variables may come from the shell
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> color_eyre::Result<Self> {
        let api_key = lookup("MAPQUEST_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| eyre!("`MAPQUEST_API_KEY` environment variable must be set"))?;

        Ok(
            Self {
                api_key,
                cache_file: lookup("NPS_CACHE_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE)),
                nps_base_url: lookup("NPS_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_NPS_BASE_URL.to_string()),
                radius_url: lookup("MAPQUEST_RADIUS_URL")
                    .unwrap_or_else(|| DEFAULT_RADIUS_URL.to_string()),
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("MAPQUEST_API_KEY", "abc")])).unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.cache_file, PathBuf::from("nps_cache.json"));
        assert_eq!(config.nps_base_url, "https://www.nps.gov");
        assert_eq!(config.radius_url, "http://www.mapquestapi.com/search/v2/radius");
    }

    #[test]
    fn test_overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("MAPQUEST_API_KEY", "abc"),
            ("NPS_CACHE_FILE", "/tmp/other.json"),
            ("NPS_BASE_URL", "http://localhost:8000"),
            ("MAPQUEST_RADIUS_URL", "http://localhost:9000/radius"),
        ])).unwrap();

        assert_eq!(config.cache_file, PathBuf::from("/tmp/other.json"));
        assert_eq!(config.nps_base_url, "http://localhost:8000");
        assert_eq!(config.radius_url, "http://localhost:9000/radius");
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("MAPQUEST_API_KEY"));

        assert!(Config::from_lookup(lookup_from(&[("MAPQUEST_API_KEY", "  ")])).is_err());
    }
}
