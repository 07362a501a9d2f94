//! External search backends: the Elasticsearch-compatible engine and the per-term suggestion API.
//!
//! Both are consumed through narrow traits so the executors can run against the in-memory
//! mocks in tests.

pub mod engine;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod suggest;
pub mod types;


pub use engine::{ElasticsearchClient, SearchEngine};
pub use error::{BackendError, BackendResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::{CatalogEntry, MockCatalog, MockSearchEngine, MockSuggestionApi};
pub use suggest::{HttpSuggestionClient, Suggestion, SuggestionApi, SuggestionRequest};
pub use types::{
    HitSource, MultiSearchRequest, MultiSearchResponse, QueryResponse, RawHit, RejectedHit,
};
