use axum::{
    extract::{rejection::FormRejection, Form, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;

use crate::pages;
use crate::AppState;

use super::ApiError;

/// Form body of the Pokémon colour search
#[derive(Debug, Deserialize)]
pub struct PokemonForm {
    #[serde(default)]
    pub pokecolour: Option<String>,
}

fn render(state: &AppState, name: &str, context: &Context) -> Result<Html<String>, ApiError> {
    state
        .renderer
        .render(name, context)
        .map(Html)
        .map_err(|e| ApiError::internal(format!("{:#}", e)))
}

/// Landing page with the current server time
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let mut context = Context::new();
    context.insert("title", "Template Demo");
    context.insert("time", &chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string());
    render(&state, pages::INDEX, &context)
}

pub async fn hundred_days(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render(&state, pages::HUNDRED_DAYS, &Context::new())
}

/// Fetch a random joke and show it
pub async fn chuck(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let joke = state.trivia.random_joke().await.map_err(|e| {
        tracing::warn!("Joke lookup failed: {:#}", e);
        ApiError::bad_gateway(format!("joke lookup failed: {}", e))
    })?;

    let mut context = Context::new();
    context.insert("joke", &joke);
    render(&state, pages::CHUCK, &context)
}

/// Empty colour search form
pub async fn pokemon_form(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let mut context = Context::new();
    context.insert("pokemon", &Vec::<String>::new());
    render(&state, pages::POKEMON, &context)
}

/// Colour search results; a blank colour renders the empty form
pub async fn pokemon_search(
    State(state): State<Arc<AppState>>,
    form: Result<Form<PokemonForm>, FormRejection>,
) -> Result<Html<String>, ApiError> {
    let Form(form) = form?;
    let colour = form
        .pokecolour
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let pokemon = match colour {
        Some(colour) => state.trivia.species_by_color(colour).await.map_err(|e| {
            tracing::warn!("Pokemon lookup for {:?} failed: {:#}", colour, e);
            ApiError::bad_gateway(format!("pokemon lookup failed: {}", e))
        })?,
        None => Vec::new(),
    };

    let mut context = Context::new();
    context.insert("pokemon", &pokemon);
    render(&state, pages::POKEMON, &context)
}
