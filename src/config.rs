use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Caps applied while building a processed page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    pub preview_chars: usize,
    pub max_links: usize,
    pub max_images: usize,
    pub max_headings: usize,
    pub top_keywords: usize,
    pub top_domains: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            preview_chars: 200,
            max_links: 20,
            max_images: 15,
            max_headings: 30,
            top_keywords: 10,
            top_domains: 5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::new(IpAddr::from([127, 0, 0, 1]), DEFAULT_PORT),
            limits: Limits::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let ip = IpAddr::from_str(&host)?;

        let defaults = Limits::default();
        let limits = Limits {
            preview_chars: parse_or(&lookup, "PREVIEW_CHARS", defaults.preview_chars)?,
            max_links: parse_or(&lookup, "MAX_LINKS", defaults.max_links)?,
            max_images: parse_or(&lookup, "MAX_IMAGES", defaults.max_images)?,
            max_headings: parse_or(&lookup, "MAX_HEADINGS", defaults.max_headings)?,
            top_keywords: parse_or(&lookup, "TOP_KEYWORDS", defaults.top_keywords)?,
            top_domains: parse_or(&lookup, "TOP_DOMAINS", defaults.top_domains)?,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            limits,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.limits, Limits::default());
    }

    #[test]
    fn overrides_host_port_and_limits() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("MAX_LINKS", "5"),
            ("TOP_KEYWORDS", " 3 "),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.limits.max_links, 5);
        assert_eq!(config.limits.top_keywords, 3);
        assert_eq!(config.limits.max_images, 15);
    }

    #[test]
    fn rejects_invalid_port() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(ref msg) if msg.contains("PORT")));
    }

    #[test]
    fn rejects_invalid_host() {
        let err = Config::from_lookup(lookup_from(&[("HOST", "localhost:1")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
