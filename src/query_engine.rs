use async_trait::async_trait;
use serde::Serialize;

use crate::data_models::ListingSummary;
use crate::error::Result;
use crate::query_interpreter::{InterpretedQuery, QueryInterpreter};
use crate::result_filter::{FilteredResults, ResultFilter};

/// Anything that can turn a keyword query into raw listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ListingSummary>>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub query: InterpretedQuery,
    pub listings: FilteredResults,
    pub raw_count: usize,
}

/// Interpret, fetch, filter.
pub struct QueryEngine {
    interpreter: QueryInterpreter,
    result_filter: ResultFilter,
    source: Box<dyn ListingSource>,
}

impl QueryEngine {
    pub fn new(
        interpreter: QueryInterpreter,
        result_filter: ResultFilter,
        source: Box<dyn ListingSource>,
    ) -> Self {
        Self {
            interpreter,
            result_filter,
            source,
        }
    }

    pub fn with_source(source: Box<dyn ListingSource>) -> Self {
        Self::new(QueryInterpreter::default(), ResultFilter::default(), source)
    }

    pub fn interpreter(&self) -> &QueryInterpreter {
        &self.interpreter
    }

    pub async fn query(&self, phrase: &str) -> Result<SearchOutcome> {
        let interpreted = self.interpreter.interpret(phrase);
        log::info!(
            "searching {:?} (api query {:?}, pack {:?})",
            interpreted.original_phrase,
            interpreted.api_query,
            interpreted.pack_intent.quantity()
        );

        let raw = self.source.search(&interpreted.api_query).await?;
        let raw_count = raw.len();
        let listings = self.result_filter.filter(raw, &interpreted.pack_intent);

        Ok(SearchOutcome {
            query: interpreted,
            listings,
            raw_count,
        })
    }
}
