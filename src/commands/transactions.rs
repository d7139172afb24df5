use crate::db::Db;
use crate::error::{ErrorType, IntoResult};
use crate::model::{MonthFilter, Page, Transaction};
use crate::Result;
use tracing::trace;

/// Lists one page of the month's transactions that match `search`.
///
/// An empty `search` matches everything. Otherwise a transaction matches when its title or
/// description contains `search` (ignoring ASCII case) or its price, written out as text, contains
/// `search`. Results are in insertion order. An empty page is not an error.
pub async fn list_transactions(
    db: &Db,
    filter: &MonthFilter,
    search: &str,
    page: Page,
) -> Result<Vec<Transaction>> {
    trace!(
        "Listing month {} search '{search}' page {} per page {}",
        filter.month(),
        page.page(),
        page.per_page()
    );
    db.list(filter, search, page)
        .await
        .pub_result(ErrorType::Database)
}
