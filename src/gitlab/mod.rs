//! GitLab REST access: transport, pagination, counting, project decoding

pub mod client;
pub mod counts;
pub mod endpoints;
pub mod error;
pub mod pagination;
pub mod project;
pub mod transport;

pub use client::RestClient;
pub use counts::{CountLimits, SumOutcome};
pub use error::{FetchError, FetchResult};
pub use project::{parse_project, BaseStatistics, Group, RepositoryDescriptor};
pub use transport::{ApiResponse, Transport};

#[cfg(test)]
pub(crate) mod tests;
