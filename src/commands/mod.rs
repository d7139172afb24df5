//! Operations of the sales-board service.
//!
//! Each operation takes the record store (and the dataset source where needed) and returns a
//! serializable result. The HTTP handlers and the CLI subcommands are thin wrappers around these.

mod initialize;
mod reports;
mod serve;
mod transactions;

use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use initialize::{init, initialize, INITIALIZED};
pub use reports::{category_breakdown, combined, price_range, statistics};
pub use serve::serve;
pub use transactions::list_transactions;

/// The output type for a CLI command: a message for the user and, optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_from_message() {
        let out: Out<u64> = "done".into();
        assert_eq!(out.message(), "done");
        assert!(out.structure().is_none());
    }

    #[test]
    fn test_out_serializes_structure() {
        let out = Out::new(INITIALIZED, 20u64);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["message"], INITIALIZED);
        assert_eq!(json["structure"], 20);
    }
}
