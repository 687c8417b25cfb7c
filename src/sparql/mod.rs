//! SPARQL query construction, execution and result handling.
//!
//! - [`builder`]: a typed `SELECT` builder that escapes everything it renders
//! - [`queries`]: the find, top-level, children, expand and superordinate queries
//! - [`endpoint`]: sends queries to `sparql.json`
//! - [`results`]: the SPARQL JSON results model
//! - [`ranking`]: per-subject language ranking and sorting of result records

pub mod builder;
pub mod endpoint;
pub mod queries;
pub mod ranking;
pub mod results;

pub use builder::SelectQuery;
pub use endpoint::SparqlEndpoint;
pub use results::SparqlResponse;
