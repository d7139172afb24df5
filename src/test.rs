//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::{Source, TestSource};
use crate::db::Db;
use crate::error::Res;
use crate::model::{NewTransaction, SaleDate};
use crate::server::{self, AppState};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;

/// Test environment with a record store in a temporary directory.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub(crate) struct TestEnv {
    _temp_dir: TempDir,
    database_url: String,
    db: Db,
}

impl TestEnv {
    /// Creates a test environment with an empty, migrated record store.
    pub(crate) async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let database_url = format!("sqlite:{}", temp_dir.path().join("test.sqlite").display());
        let db = Db::open(&database_url).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            database_url,
            db,
        }
    }

    /// Creates a test environment loaded with the `TestSource` seed data.
    pub(crate) async fn seeded() -> Self {
        let env = Self::new().await;
        let data = TestSource::default().fetch().await.unwrap();
        env.seed(&data).await;
        env
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Replaces the contents of the store with `records`.
    pub(crate) async fn seed(&self, records: &[NewTransaction]) {
        self.db.replace_all(records).await.unwrap();
    }

    /// Service state backed by this store and the default `TestSource`.
    pub(crate) fn state(&self) -> AppState {
        self.state_with(TestSource::default())
    }

    pub(crate) fn state_with(&self, source: impl Source + 'static) -> AppState {
        AppState::new(self.db.clone(), Arc::new(source))
    }
}

/// Builds a record. `date` may be `YYYY-MM-DD` or RFC 3339.
pub(crate) fn record(
    title: &str,
    price: f64,
    date: &str,
    category: &str,
    sold: bool,
) -> NewTransaction {
    NewTransaction::new(
        title,
        price,
        SaleDate::from_str(date).unwrap(),
        category,
        sold,
    )
}

/// A source whose download always fails.
pub(crate) struct FailingSource;

#[async_trait::async_trait]
impl Source for FailingSource {
    async fn fetch(&self) -> Res<Vec<NewTransaction>> {
        anyhow::bail!("The dataset host is unreachable")
    }
}

/// Serves the router on an ephemeral local port and returns its address.
pub(crate) async fn spawn(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, server::router(state)).await.unwrap() });
    addr
}
