pub mod client;
pub mod types;

pub use client::GraphClient;
pub use types::{CountryInfo, MetricInfo, NamedNode};
