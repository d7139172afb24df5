use crate::api::{self, Mode};
use crate::commands::Out;
use crate::db::Db;
use crate::error::{ErrorType, IntoResult};
use crate::server::{self, AppState};
use crate::{Config, Result};
use tracing::info;

/// The `serve` CLI subcommand: open the record store, run the HTTP service until a shutdown signal
/// arrives, then close the store.
pub async fn serve(config: Config, mode: Mode) -> Result<Out<()>> {
    let db = Db::open(config.database_url())
        .await
        .pub_result(ErrorType::Database)?;
    let source = api::source(&config, mode).pub_result(ErrorType::Config)?;
    info!("Serving with the {mode} dataset source");

    let state = AppState::new(db.clone(), source);
    let result = server::run(&config, state)
        .await
        .pub_result(ErrorType::Service);
    db.close().await;
    result?;

    Ok(Out::new_message("Server stopped"))
}
