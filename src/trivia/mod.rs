pub mod client;
pub mod types;

use anyhow::Result;

pub use client::TriviaClient;

/// Outbound lookups used by the demo pages.
///
/// Implemented by `TriviaClient` against the public APIs; tests swap in a
/// fixed source.
#[async_trait::async_trait]
pub trait TriviaSource: Send + Sync {
    /// A random joke's text
    async fn random_joke(&self) -> Result<String>;

    /// Names of the Pokémon species of the given colour, in API order
    async fn species_by_color(&self, color: &str) -> Result<Vec<String>>;
}
