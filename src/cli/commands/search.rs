//! Search command.

use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::search::{SearchAggregator, SearchHits, SearchKind, UpstreamSearchClient};

/// Search upstream and print the normalized results as JSON.
///
/// `kind` is one of the search kinds or `all`.
pub fn cmd_search(rt: &Runtime, config: &Config, kind: &str, query: &str) -> anyhow::Result<()> {
    let client = UpstreamSearchClient::new(&config.upstream)?;
    let aggregator = SearchAggregator::new(Arc::new(client));
    rt.block_on(run(&aggregator, kind, query))
}

async fn run(aggregator: &SearchAggregator, kind: &str, query: &str) -> anyhow::Result<()> {
    if kind == "all" {
        let overview = aggregator.search_all(query).await;
        println!("{}", serde_json::to_string_pretty(&overview)?);
        eprintln!(
            "{} songs, {} playlists, {} albums",
            overview.songs.len(),
            overview.playlists.len(),
            overview.albums.len()
        );
        return Ok(());
    }

    let kind: SearchKind = kind.parse()?;
    let hits = aggregator.search(kind, query).await?;
    println!("{}", serde_json::to_string_pretty(&hits)?);

    if let SearchHits::Songs(tracks) = &hits {
        let inert = tracks.iter().filter(|t| !t.is_playable()).count();
        if inert > 0 {
            eprintln!("{} of {} songs have no playable audio", inert, tracks.len());
        }
    }
    Ok(())
}
