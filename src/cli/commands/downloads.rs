//! Download history commands.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, ResultExt};
use crate::model::{UNKNOWN_ARTIST, UNKNOWN_TITLE};
use crate::store::{DownloadHistory, JsonFileStore, StoreError, default_store_path};

fn open_history(config: &Config) -> crate::error::Result<DownloadHistory> {
    let path = config
        .storage
        .path
        .clone()
        .or_else(default_store_path)
        .ok_or_else(|| Error::from(StoreError::Invalid("no data directory".to_string())))?;
    let store = JsonFileStore::open(path.clone()).with_context(format!("opening {}", path.display()))?;
    Ok(DownloadHistory::new(Arc::new(store)))
}

/// List recorded downloads
pub fn cmd_downloads_list(config: &Config) -> anyhow::Result<()> {
    let history = open_history(config)?;
    let records = history.list()?;

    if records.is_empty() {
        println!("No downloads recorded.");
        return Ok(());
    }

    for record in &records {
        let title = record.title.as_deref().unwrap_or(UNKNOWN_TITLE);
        let artist = record.artist.as_deref().unwrap_or(UNKNOWN_ARTIST);
        let when = record
            .at
            .and_then(chrono::DateTime::from_timestamp_millis)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}  {} - {}", when, artist, title);
        println!("    {}", record.url);
    }
    println!("\n{} download(s)", records.len());
    Ok(())
}

/// Forget all recorded downloads
pub fn cmd_downloads_clear(config: &Config) -> anyhow::Result<()> {
    let history = open_history(config)?;
    history.clear()?;
    println!("Download history cleared.");
    Ok(())
}
