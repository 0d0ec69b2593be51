//! Search: turn a file specification into item records.
//!
//! - [`FileSpec`] describes what to look for (structured pattern or literal AQL)
//! - [`aql`] translates structured patterns into queries
//! - [`SearchClient`] runs the query and normalizes the results into [`ItemRecord`]s

pub mod aql;
mod client;
mod spec;

pub use client::{SearchClient, parse_search_results};
pub use spec::{FileSpec, ItemKind, ItemRecord, QueryMode};
