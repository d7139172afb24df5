//! This module is responsible for reading, writing and managing the SQLite record store.

mod migrations;

use crate::error::Res;
use crate::model::{CategoryCount, MonthFilter, NewTransaction, Page, PriceBucket, Transaction};
use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Rows per `INSERT` statement. Eight binds per row keeps us far below SQLite's parameter limit.
const INSERT_CHUNK: usize = 100;

/// A handle to the record store. Cloning is cheap; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// - Parses `url` as a SQLite connection string, e.g. `sqlite:sales.sqlite`
    /// - Creates the database file if it does not exist
    /// - Updates the database schema with migrations if it is out-of-date
    /// - Returns a constructed `Db` object for further operations
    pub async fn open(url: &str) -> Res<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Failed to parse SQLite connection string '{url}'"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to SQLite database at '{url}'"))?;

        let current = migrations::bootstrap(&pool).await?;
        migrations::run(&pool, current, migrations::CURRENT_VERSION).await?;
        info!("Record store connected");
        Ok(Self { pool })
    }

    /// Closes every connection in the pool. Queries issued afterwards fail.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Record store closed");
    }

    /// Replaces the whole collection with `records`.
    ///
    /// The delete and the inserts share one transaction, so readers see either the old rows or
    /// the new rows, and a failure part way through leaves the old rows in place.
    pub(crate) async fn replace_all(&self, records: &[NewTransaction]) -> Res<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin replace transaction")?;

        let deleted = sqlx::query("DELETE FROM transactions")
            .execute(&mut *tx)
            .await
            .context("Failed to delete existing transactions")?
            .rows_affected();
        debug!("Deleted {deleted} existing transactions");

        let mut inserted = 0;
        for chunk in records.chunks(INSERT_CHUNK) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO transactions \
                 (title, description, price, date_of_sale, category, sold, \
                  title_folded, description_folded) ",
            );
            builder.push_values(chunk, |mut row, t| {
                row.push_bind(t.title.clone())
                    .push_bind(t.description.clone())
                    .push_bind(t.price)
                    .push_bind(t.date_of_sale.map(|d| d.to_string()))
                    .push_bind(t.category.clone())
                    .push_bind(t.sold)
                    .push_bind(t.title.as_deref().map(str::to_lowercase))
                    .push_bind(t.description.as_deref().map(str::to_lowercase));
            });
            inserted += builder
                .build()
                .execute(&mut *tx)
                .await
                .context("Failed to insert transactions")?
                .rows_affected();
        }

        tx.commit()
            .await
            .context("Failed to commit replace transaction")?;
        Ok(inserted)
    }

    /// Returns one page of transactions in `filter`'s month whose title or description contains
    /// `search` (ignoring case) or whose price, written as text, contains `search`.
    ///
    /// Case folding uses Rust's Unicode lowercase on both sides: the `*_folded` columns are
    /// written by `replace_all` and the search term is folded here.
    pub(crate) async fn list(
        &self,
        filter: &MonthFilter,
        search: &str,
        page: Page,
    ) -> Res<Vec<Transaction>> {
        sqlx::query_as::<_, Transaction>(
            "SELECT id, title, description, price, date_of_sale, category, sold
             FROM transactions
             WHERE date_of_sale GLOB ?1
               AND (?2 = ''
                    OR instr(title_folded, ?5) > 0
                    OR instr(description_folded, ?5) > 0
                    OR instr(CAST(price AS TEXT), ?2) > 0)
             ORDER BY id
             LIMIT ?3 OFFSET ?4",
        )
        .bind(filter.pattern())
        .bind(search)
        .bind(page.limit())
        .bind(page.offset())
        .bind(search.to_lowercase())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")
    }

    /// Number of transactions in the month.
    #[cfg(test)]
    pub(crate) async fn count(&self, filter: &MonthFilter) -> Res<u64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM transactions WHERE date_of_sale GLOB ?")
                .bind(filter.pattern())
                .fetch_one(&self.pool)
                .await
                .context("Failed to count transactions")?;
        Ok(to_count(row.0))
    }

    /// Sum of `price` over the month, `0` when there are no rows.
    pub(crate) async fn sum_price(&self, filter: &MonthFilter) -> Res<f64> {
        let row: (f64,) = sqlx::query_as(
            "SELECT CAST(COALESCE(SUM(price), 0) AS REAL)
             FROM transactions WHERE date_of_sale GLOB ?",
        )
        .bind(filter.pattern())
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum prices")?;
        Ok(row.0)
    }

    /// Number of transactions in the month with the given `sold` flag.
    pub(crate) async fn count_sold(&self, filter: &MonthFilter, sold: bool) -> Res<u64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM transactions WHERE date_of_sale GLOB ? AND sold = ?",
        )
        .bind(filter.pattern())
        .bind(sold)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to count transactions with sold = {sold}"))?;
        Ok(to_count(row.0))
    }

    /// Number of transactions in the month whose price falls in `bucket`.
    pub(crate) async fn count_in_range(
        &self,
        filter: &MonthFilter,
        bucket: &PriceBucket,
    ) -> Res<u64> {
        let (lower, inclusive) = bucket.lower_bound();
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM transactions WHERE date_of_sale GLOB ");
        builder.push_bind(filter.pattern());
        builder.push(if inclusive {
            " AND price >= "
        } else {
            " AND price > "
        });
        builder.push_bind(lower);
        if let Some(max) = bucket.max() {
            builder.push(" AND price <= ");
            builder.push_bind(f64::from(max));
        }

        let row = builder
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to count prices in range {}", bucket.label()))?;
        Ok(to_count(row.0))
    }

    /// Transaction counts per distinct category in the month. A missing category is its own group.
    pub(crate) async fn category_counts(&self, filter: &MonthFilter) -> Res<Vec<CategoryCount>> {
        let rows: Vec<(Option<String>, i64)> = sqlx::query_as(
            "SELECT category, COUNT(*) FROM transactions
             WHERE date_of_sale GLOB ?
             GROUP BY category",
        )
        .bind(filter.pattern())
        .fetch_all(&self.pool)
        .await
        .context("Failed to group transactions by category")?;

        Ok(rows
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category,
                count: to_count(count),
            })
            .collect())
    }
}

fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or_default()
}
