pub mod entities;
pub mod mock;
mod persistence;
mod streams;
mod transactions;

pub use persistence::*;
pub use streams::*;
pub use transactions::*;

use log::LevelFilter;
use runnel_core::DbmsType;
use std::{env, sync::Arc};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs every dialect parameterized scenario against `dbms`. Dialect crates
/// invoke this from their own `tests/` directory.
pub async fn execute_scenarios(dbms: Arc<dyn DbmsType>) {
    select_and_collect(dbms.clone()).await;
    filter_push_down(dbms.clone()).await;
    pagination_push_down(dbms.clone()).await;
    count_fast_path(dbms.clone()).await;
    count_streamed_fallback(dbms.clone()).await;
    find_any_binds_predicate(dbms.clone()).await;
    client_side_residuals(dbms.clone()).await;
    close_releases_once().await;
    generated_keys_round_trip(dbms.clone()).await;
    generated_key_count_mismatch(dbms.clone()).await;
    missing_primary_key_guard(dbms.clone()).await;
    update_and_remove_bind_order(dbms.clone()).await;
    merge_inserts_when_missing(dbms.clone()).await;
    commit_on_success(dbms.clone()).await;
    rollback_on_error(dbms.clone()).await;
    explicit_rollback(dbms.clone()).await;
    isolation_level_applies(dbms.clone()).await;
    streams_inside_transaction(dbms).await;
}
