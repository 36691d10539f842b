//! Recommendation command.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::recommend::{RecommendRequest, Recommender};

/// Print suggested search queries, one per line.
pub fn cmd_recommend(
    rt: &Runtime,
    config: &Config,
    text: &str,
    language: Option<&str>,
    mood: Option<&str>,
) -> anyhow::Result<()> {
    let recommender = Recommender::from_api_key(config.credentials.sentiment_api_key.as_deref());
    if !recommender.has_sentiment() && mood.is_none() && !text.is_empty() {
        eprintln!("No sentiment API key set; using the neutral mood");
    }

    let request = RecommendRequest {
        text: Some(text.to_string()),
        language: language.map(str::to_string),
        mood: mood.map(str::to_string),
    };
    let response = rt.block_on(recommender.recommend(request));

    for query in response.queries {
        println!("{}", query);
    }
    Ok(())
}
