//! Read-back commands over the record directory.

use zenith::{ListResponse, RecordStorage, StatsResponse, ZenithConfig, open_storage};

/// Print every stored record.
pub async fn list_records(config: &ZenithConfig) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let records = storage.list_all().await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&ListResponse::from(records))?
    );
    Ok(())
}

/// Print directory statistics.
pub async fn show_stats(config: &ZenithConfig) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats().await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&StatsResponse {
            success: true,
            stats
        })?
    );
    Ok(())
}
