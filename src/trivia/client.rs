use anyhow::{Context, Result};
use reqwest::{Client, Url};

use super::types::*;
use super::TriviaSource;

/// HTTP client for the joke API and PokeAPI
pub struct TriviaClient {
    joke_url: String,
    pokeapi_url: String,
    client: Client,
}

impl TriviaClient {
    pub fn new(joke_url: &str, pokeapi_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            joke_url: joke_url.trim_end_matches('/').to_string(),
            pokeapi_url: pokeapi_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn joke_endpoint(&self) -> Result<Url> {
        endpoint(&self.joke_url, &["jokes", "random"])
    }

    /// The colour always lands in a single path segment, percent-encoded
    fn color_endpoint(&self, color: &str) -> Result<Url> {
        let color = color.trim().to_lowercase();
        endpoint(&self.pokeapi_url, &["pokemon-color", color.as_str()])
    }

    /// Helper to perform a GET and decode the JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let resp = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("API error {} from {}: {}", status, url, body));
        }

        Ok(resp.json().await?)
    }
}

fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("Invalid API URL {}", base))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("API URL {} cannot take a path", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait::async_trait]
impl TriviaSource for TriviaClient {
    async fn random_joke(&self) -> Result<String> {
        let joke: Joke = self.get_json(self.joke_endpoint()?).await?;
        Ok(joke.value)
    }

    async fn species_by_color(&self, color: &str) -> Result<Vec<String>> {
        let color: PokemonColor = self.get_json(self.color_endpoint(color)?).await?;
        Ok(color.species_names())
    }
}
