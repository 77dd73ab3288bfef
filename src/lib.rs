pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod repositories;

pub use client::sources::{SourceId, SourcePayload, SourceResult};
pub use client::{reference_links, DrugInfoAggregator, DrugQuery, ReferenceLink, ResultBundle};
pub use config::Config;
pub use error::{Error, Result};
pub use repositories::ResponseCache;
