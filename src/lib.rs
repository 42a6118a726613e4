//! Batch-style index administration helpers for Elasticsearch.
//!
//! [`BatchOperations`] dispatches refresh, settings, mapping and alias requests
//! and hands back the in-flight [`ActionFuture`]. [`BlockingBatchOperations`]
//! waits on the same futures for callers without an async runtime.
//!
//! ```no_run
//! # async fn run() -> Result<(), esbatch::Error> {
//! let client = esbatch::Client::builder()
//!     .url("http://127.0.0.1:9200")
//!     .build()?;
//!
//! let ops = client.batch();
//! ops.disable_refresh(&["logs-2024"]).await?;
//! ops.set_replicas(0, &["logs-2024"]).await?;
//! // bulk load ...
//! ops.set_refresh_interval("1s", &["logs-2024"]).await?;
//! ops.switch_alias("logs", "logs-2023", "logs-2024").await?;
//! # Ok(())
//! # }
//! ```

mod client;

pub mod api;
pub mod batch;
pub mod log;

pub use api::{ActionFuture, IndicesAdmin};
pub use batch::{blocking::BlockingBatchOperations, BatchOperations};
pub use client::*;
pub use error::Error;
pub use log::{NoopLog, Operation, OperationLog, TracingLog};
pub use reqwest::{Client as Reqwest, ClientBuilder as ReqwestBuilder};

mod error {
    use reqwest::header::InvalidHeaderValue;
    use thiserror::Error;
    use tosserror::Toss;

    #[derive(Debug, Error, Toss)]
    #[visibility(pub(crate))]
    pub enum Error {
        #[error("Request failed to Elasticsearch")]
        ActionFailed(#[source] reqwest::Error),
        #[error("Failed to read response body")]
        ReadBody(#[source] reqwest::Error),
        #[error("Failed to deserialize text {text} as json")]
        DeserializeText {
            text: String,
            source: serde_json::Error,
        },
        #[error("Elasticsearch responded with {status} [{kind}]: {reason}")]
        Elasticsearch {
            status: u16,
            kind: String,
            reason: String,
        },
        #[error("Setting `{key}` of index `{index}` is not a valid number: {value}")]
        InvalidSetting {
            index: String,
            key: String,
            value: String,
        },
        #[error("Elasticsearch url not found")]
        UrlNotFound,
        #[error("Credentials for `{scheme}` authorization are invalid")]
        InvalidCredentials {
            scheme: &'static str,
            source: InvalidHeaderValue,
        },
        #[error("ReqwestBuilder failed to build")]
        ReqwestBuilderFailed(#[source] reqwest::Error),
        #[error("Failed to start runtime for blocking operations")]
        RuntimeFailed(#[source] std::io::Error),
    }

    impl Error {
        /// Status code of the cluster's error response, if this is one.
        pub fn status(&self) -> Option<u16> {
            match self {
                Error::Elasticsearch { status, .. } => Some(*status),
                _ => None,
            }
        }
    }
}
