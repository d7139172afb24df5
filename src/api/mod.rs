//! Access to the remote product transaction dataset.
//!
//! The `Source` trait hides where the seed data comes from. In normal operation it is fetched over
//! HTTP. When `SALES_BOARD_IN_TEST_MODE` is set, an in-memory data set compiled into the binary is
//! used instead so the whole service can be run without network access.

mod http_source;
mod test_source;

use crate::error::Res;
use crate::model::NewTransaction;
use crate::Config;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub use http_source::HttpSource;
pub use test_source::TestSource;

const TEST_MODE_ENV: &str = "SALES_BOARD_IN_TEST_MODE";

/// Provides the full set of transactions used to (re)initialize the record store.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// Fetches every transaction from the source.
    async fn fetch(&self) -> Res<Vec<NewTransaction>>;
}

/// Chooses which `Source` implementation to use.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Fetch the dataset from the configured URL.
    #[default]
    Http,
    /// Use the seed data compiled into the program.
    Test,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    /// `Mode::Test` when `SALES_BOARD_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Constructs the `Source` for `mode`.
pub(crate) fn source(config: &Config, mode: Mode) -> Res<Arc<dyn Source>> {
    debug!("Using the {mode} dataset source");
    Ok(match mode {
        Mode::Http => Arc::new(HttpSource::new(
            config.dataset_url().clone(),
            config.fetch_timeout(),
        )?),
        Mode::Test => Arc::new(TestSource::default()),
    })
}
