use anyhow::{Context as _, Result};
use tera::{Context, Tera};

pub const INDEX: &str = "index.html";
pub const HUNDRED_DAYS: &str = "100days.html";
pub const CHUCK: &str = "chuck.html";
pub const POKEMON: &str = "pokemon.html";

const EMBEDDED: &[(&str, &str)] = &[
    ("base.html", include_str!("templates/base.html")),
    (INDEX, include_str!("templates/index.html")),
    (HUNDRED_DAYS, include_str!("templates/100days.html")),
    (CHUCK, include_str!("templates/chuck.html")),
    (POKEMON, include_str!("templates/pokemon.html")),
];

/// Renderer turns a template name plus variables into HTML
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Templates compiled into the binary
    pub fn embedded() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(EMBEDDED.to_vec())
            .context("Failed to compile embedded templates")?;
        Ok(Self { tera })
    }

    /// Every `*.html` below `dir`
    pub fn from_dir(dir: &str) -> Result<Self> {
        let glob = format!("{}/**/*.html", dir.trim_end_matches('/'));
        let tera = Tera::new(&glob).with_context(|| format!("Failed to load templates from {}", dir))?;
        Ok(Self { tera })
    }

    /// Embedded templates unless a directory is configured
    pub fn load(templates_dir: &str) -> Result<Self> {
        if templates_dir.is_empty() {
            Self::embedded()
        } else {
            Self::from_dir(templates_dir)
        }
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(name, context)
            .with_context(|| format!("Failed to render template {}", name))
    }
}
