//! Tunebridge - music search, streaming proxy and play-queue engine.
//!
//! The server side searches a third-party song/playlist/album API and
//! normalizes whatever shape it answers with into [`model::Track`]s, proxies
//! audio with Range support, relays downloads and suggests mood-based
//! searches. The [`player`] module holds the client-side queue and
//! transport state machine, driving any [`player::AudioDevice`].

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod player;
pub mod proxy;
pub mod recommend;
pub mod search;
pub mod server;
pub mod store;
#[cfg(test)]
pub mod test_utils;
