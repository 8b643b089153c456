use std::env;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub seed_path: String,
    pub templates_dir: String,
    pub joke_api_url: String,
    pub pokeapi_url: String,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// An empty `seed_path` or `templates_dir` selects the data compiled
    /// into the binary.
    pub fn load() -> Self {
        Self {
            listen_addr: get_env("LISTEN_ADDR", "127.0.0.1:5050"),
            seed_path: get_env("SEED_PATH", ""),
            templates_dir: get_env("TEMPLATES_DIR", ""),
            joke_api_url: get_env("JOKE_API_URL", "https://api.chucknorris.io"),
            pokeapi_url: get_env("POKEAPI_URL", "https://pokeapi.co/api/v2"),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
