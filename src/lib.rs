pub mod analyzer;
pub mod api;
pub mod catalog;
pub mod config;
pub mod data_models;
pub mod ebay;
pub mod error;
pub mod query_engine;
pub mod query_interpreter;
pub mod result_filter;
pub mod vocabulary;

pub use data_models::ListingSummary;
pub use query_interpreter::{InterpretedQuery, PackIntent, interpret};
pub use result_filter::{FilteredResults, filter};
