use crate::api::{self, Mode, Source};
use crate::commands::Out;
use crate::db::Db;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use tracing::{debug, info};

/// The message returned when the store has been reloaded.
pub const INITIALIZED: &str = "Database initialized successfully";

/// Replaces the contents of the record store with everything `source` returns.
///
/// The delete and the insert happen in one store transaction: if the fetch or the insert fails
/// the previous contents are left untouched. Returns the number of records loaded.
pub async fn initialize(db: &Db, source: &dyn Source) -> Result<Out<u64>> {
    let records = source.fetch().await.pub_result(ErrorType::Fetch)?;
    debug!("Fetched {} records from the dataset source", records.len());
    let loaded = db
        .replace_all(&records)
        .await
        .pub_result(ErrorType::Database)?;
    info!("Loaded {loaded} transactions into the record store");
    Ok(Out::new(INITIALIZED, loaded))
}

/// The `initialize` CLI subcommand: open the store, load the dataset and close the store.
pub async fn init(config: Config, mode: Mode) -> Result<Out<u64>> {
    let db = Db::open(config.database_url())
        .await
        .pub_result(ErrorType::Database)?;
    let source = api::source(&config, mode).pub_result(ErrorType::Config)?;
    let result = initialize(&db, source.as_ref()).await;
    db.close().await;
    result
}
