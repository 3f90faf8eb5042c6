use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        bind_addr: get_env_or_default("BIND_ADDR", "127.0.0.1:3000"),
        listing_source: ListingSourceKind::parse(&get_env_or_default("LISTING_SOURCE", "ebay")),
        catalog_path: get_env_or_default("CATALOG_PATH", "products.json"),
        ebay_app_id: get_optional_env("EBAY_APP_ID"),
        ebay_client_secret: get_optional_env("EBAY_CLIENT_SECRET"),
        ebay_sandbox: get_env_or_default("EBAY_SANDBOX", "false").eq_ignore_ascii_case("true"),
        search_limit: get_env_or_default("SEARCH_LIMIT", "50")
            .parse()
            .unwrap_or(50),
    }
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSourceKind {
    Ebay,
    Catalog,
}

impl ListingSourceKind {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("catalog") {
            ListingSourceKind::Catalog
        } else {
            ListingSourceKind::Ebay
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub listing_source: ListingSourceKind,
    pub catalog_path: String,
    pub ebay_app_id: Option<String>,
    pub ebay_client_secret: Option<String>,
    pub ebay_sandbox: bool,
    pub search_limit: u32,
}

fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[test]
fn test_listing_source_kind_parse() {
    assert_eq!(ListingSourceKind::parse("catalog"), ListingSourceKind::Catalog);
    assert_eq!(ListingSourceKind::parse("CATALOG"), ListingSourceKind::Catalog);
    assert_eq!(ListingSourceKind::parse("ebay"), ListingSourceKind::Ebay);
    assert_eq!(ListingSourceKind::parse("anything"), ListingSourceKind::Ebay);
}
