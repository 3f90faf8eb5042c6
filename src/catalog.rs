use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::data_models::{CatalogProduct, ListingSummary};
use crate::error::{Result, SearchError};
use crate::query_engine::ListingSource;

#[derive(Deserialize, Debug, Default)]
struct CatalogFile {
    #[serde(default)]
    products: Map<String, Value>,
}

/// Product catalog read from a local `products.json`, keyed by category name.
/// Categories stay in file order.
#[derive(Debug, Default)]
pub struct LocalCatalog {
    categories: Vec<(String, Vec<CatalogProduct>)>,
}

impl LocalCatalog {
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        if file.products.is_empty() {
            return Err(SearchError::Catalog("catalog has no products".to_string()));
        }
        let categories = file
            .products
            .into_iter()
            .map(|(name, products)| -> Result<(String, Vec<CatalogProduct>)> {
                Ok((name, serde_json::from_value(products)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { categories })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        log::info!(
            "loaded {} catalog products in {} categories from {}",
            catalog.len(),
            catalog.categories.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|(_, products)| products.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A category matches when its name, or the name minus its last character
    /// ("cookies" -> "cookie"), contains the term.
    fn category_matches(category: &str, term: &str) -> bool {
        let category = category.to_lowercase();
        let mut singular = category.clone();
        singular.pop();
        category.contains(term) || singular.contains(term)
    }

    fn product_matches(product: &CatalogProduct, term: &str) -> bool {
        [&product.description, &product.flavor, &product.kind]
            .iter()
            .any(|field| field.to_lowercase().contains(term))
    }

    /// Products in catalog order whose category or description/flavor/type mention `term`.
    pub fn lookup(&self, term: &str) -> Vec<ListingSummary> {
        let term = term.trim().to_lowercase();
        let term = term.as_str();
        if term.is_empty() {
            return Vec::new();
        }

        self.categories
            .iter()
            .flat_map(|(category, products)| {
                let whole_category = Self::category_matches(category, term);
                products
                    .iter()
                    .filter(move |p| whole_category || Self::product_matches(p, term))
            })
            .map(ListingSummary::from)
            .collect()
    }
}

#[async_trait]
impl ListingSource for LocalCatalog {
    async fn search(&self, query: &str) -> Result<Vec<ListingSummary>> {
        Ok(self.lookup(query))
    }
}
