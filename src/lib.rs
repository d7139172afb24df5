pub mod api;
pub mod args;
pub mod commands;
mod config;
pub mod db;
mod error;
pub mod model;
mod server;

#[cfg(test)]
mod test;

pub use api::Mode;
pub use config::Config;
pub use db::Db;
pub use error::{Error, ErrorType, Result};
