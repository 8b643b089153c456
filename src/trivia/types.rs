use serde::{Deserialize, Serialize};

// --- Joke API types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Joke {
    pub value: String,
}

// --- PokeAPI types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonColor {
    pub pokemon_species: Vec<NamedResource>,
}

impl PokemonColor {
    pub fn species_names(self) -> Vec<String> {
        self.pokemon_species.into_iter().map(|s| s.name).collect()
    }
}
