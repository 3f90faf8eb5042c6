use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::data_models::{BrowseSearchResponse, ListingSummary, OAuthToken};
use crate::error::{Result, SearchError};
use crate::query_engine::ListingSource;

const OAUTH_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";

/// Tokens are treated as expired this long before eBay says they are.
const EXPIRY_BUFFER_SECS: i64 = 300;

#[derive(Debug, Clone)]
pub struct EbayCredentials {
    pub app_id: String,
    pub client_secret: String,
    pub sandbox: bool,
}

impl EbayCredentials {
    pub fn from_config(config: &Config) -> Result<Self> {
        let app_id = config
            .ebay_app_id
            .clone()
            .ok_or(SearchError::MissingCredentials("EBAY_APP_ID"))?;
        let client_secret = config
            .ebay_client_secret
            .clone()
            .ok_or(SearchError::MissingCredentials("EBAY_CLIENT_SECRET"))?;
        Ok(Self {
            app_id,
            client_secret,
            sandbox: config.ebay_sandbox,
        })
    }

    fn api_host(&self) -> &'static str {
        if self.sandbox {
            "https://api.sandbox.ebay.com"
        } else {
            "https://api.ebay.com"
        }
    }

    fn basic_auth(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.app_id, self.client_secret))
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Holds the last OAuth token until shortly before it expires.
#[derive(Debug, Default)]
pub struct TokenCache {
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, now: DateTime<Utc>) -> Option<String> {
        let cached = self.cached.lock().await;
        cached
            .as_ref()
            .filter(|c| c.expires_at > now)
            .map(|c| c.token.clone())
    }

    /// Caches `token` until its lifetime minus the buffer. A lifetime that does not fit in
    /// a timestamp leaves the cache empty, so the next search fetches a fresh token.
    pub async fn store(&self, token: &OAuthToken, now: DateTime<Utc>) {
        let expires_at =
            Duration::try_seconds(token.expires_in.saturating_sub(EXPIRY_BUFFER_SECS))
                .and_then(|ttl| now.checked_add_signed(ttl));

        let mut cached = self.cached.lock().await;
        *cached = match expires_at {
            Some(expires_at) => Some(CachedToken {
                token: token.access_token.clone(),
                expires_at,
            }),
            None => {
                log::warn!(
                    "not caching eBay token with out-of-range lifetime {}s",
                    token.expires_in
                );
                None
            }
        };
    }
}

/// eBay Browse API client with client-credentials OAuth.
pub struct EbayClient {
    http: reqwest::Client,
    credentials: EbayCredentials,
    tokens: TokenCache,
    limit: u32,
}

impl EbayClient {
    pub fn new(credentials: EbayCredentials, limit: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            tokens: TokenCache::new(),
            limit,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            EbayCredentials::from_config(config)?,
            config.search_limit,
        ))
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.tokens.get(Utc::now()).await {
            return Ok(token);
        }

        let url = format!("{}/identity/v1/oauth2/token", self.credentials.api_host());
        let res = self
            .http
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.credentials.basic_auth()),
            )
            .form(&[("grant_type", "client_credentials"), ("scope", OAUTH_SCOPE)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            log::error!("eBay auth failed with status {status}: {body}");
            return Err(SearchError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let token: OAuthToken = res.json().await?;
        self.tokens.store(&token, Utc::now()).await;
        log::info!("fetched eBay access token, expires in {}s", token.expires_in);
        Ok(token.access_token)
    }
}

#[async_trait]
impl ListingSource for EbayClient {
    async fn search(&self, query: &str) -> Result<Vec<ListingSummary>> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/buy/browse/v1/item_summary/search",
            self.credentials.api_host()
        );
        let limit = self.limit.to_string();
        let res = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("q", query), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            log::error!("eBay search for {query:?} failed with status {status}");
            return Err(SearchError::Upstream(status.as_u16()));
        }

        let body: BrowseSearchResponse = res.json().await?;
        log::debug!(
            "eBay returned {} of {} items for {query:?}",
            body.item_summaries.len(),
            body.total
        );
        Ok(body
            .item_summaries
            .into_iter()
            .map(ListingSummary::from)
            .collect())
    }
}
