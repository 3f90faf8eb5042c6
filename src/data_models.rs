use serde::{Deserialize, Serialize};

pub const PRICE_NOT_AVAILABLE: &str = "N/A";

/// One listing as handed to the result filter and back to the caller.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingSummary {
    pub title: String,
    pub link: String,
    pub image_url: String,
    pub price: String,
}

impl ListingSummary {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        image_url: impl Into<String>,
        price: impl Into<String>,
    ) -> ListingSummary {
        ListingSummary {
            title: title.into(),
            link: link.into(),
            image_url: image_url.into(),
            price: price.into(),
        }
    }

    /// A listing without a title, link or image cannot be shown or followed.
    pub fn is_renderable(&self) -> bool {
        !self.title.is_empty() && !self.link.is_empty() && !self.image_url.is_empty()
    }
}

pub fn format_price(value: &str, currency: &str) -> String {
    match (value.trim(), currency.trim()) {
        ("", _) => PRICE_NOT_AVAILABLE.to_string(),
        (value, "") => value.to_string(),
        (value, currency) => format!("{currency} {value}"),
    }
}

// =============================================================================
// eBay Browse API payloads (item_summary/search)
// =============================================================================

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowseSearchResponse {
    pub total: u64,
    pub item_summaries: Vec<BrowseItemSummary>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowseItemSummary {
    pub item_id: String,
    pub title: String,
    pub item_web_url: String,
    pub image: Option<BrowseImage>,
    pub price: Option<BrowsePrice>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowseImage {
    pub image_url: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct BrowsePrice {
    pub value: String,
    pub currency: String,
}

impl From<BrowseItemSummary> for ListingSummary {
    fn from(item: BrowseItemSummary) -> Self {
        let price = item
            .price
            .map(|p| format_price(&p.value, &p.currency))
            .unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string());
        ListingSummary {
            title: item.title,
            link: item.item_web_url,
            image_url: item.image.map(|i| i.image_url).unwrap_or_default(),
            price,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct OAuthToken {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
}

// =============================================================================
// Local catalog records (products.json)
// =============================================================================

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogProduct {
    pub title: String,
    pub link: String,
    pub price: Option<CatalogPrice>,
    pub currency: String,
    pub image_url: String,
    pub description: String,
    pub flavor: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub brand: String,
}

/// Catalog files carry prices both as JSON numbers and as strings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CatalogPrice {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for CatalogPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogPrice::Number(n) => write!(f, "{n}"),
            CatalogPrice::Text(s) => f.write_str(s),
        }
    }
}

impl From<&CatalogProduct> for ListingSummary {
    fn from(product: &CatalogProduct) -> Self {
        let title = if product.title.is_empty() {
            product.description.clone()
        } else {
            product.title.clone()
        };
        let price = product
            .price
            .as_ref()
            .map(|p| format_price(&p.to_string(), &product.currency))
            .unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string());
        ListingSummary {
            title,
            link: product.link.clone(),
            image_url: product.image_url.clone(),
            price,
        }
    }
}
