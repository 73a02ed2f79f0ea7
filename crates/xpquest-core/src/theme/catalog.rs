//! Theme catalog loading.
//!
//! The catalog is loaded once at startup. Any failure (missing file, network
//! error, bad JSON) leaves the catalog empty and is logged; there is no retry
//! and no built-in fallback list.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use url::Url;

use crate::error::CatalogError;

/// A purchasable cosmetic skin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub css_variables: BTreeMap<String, String>,
    #[serde(default)]
    pub background: String,
    /// Suggested unlock price in XP.
    #[serde(default)]
    pub cost: Option<u64>,
}

impl Theme {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSource {
    File(PathBuf),
    Url(Url),
}

impl ThemeSource {
    /// Interpret a configured source string. `http(s)://` values are URLs,
    /// anything else is a path resolved against `base_dir` when relative.
    pub fn parse(source: &str, base_dir: &Path) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            if let Ok(url) = Url::parse(source) {
                return ThemeSource::Url(url);
            }
        }
        let path = PathBuf::from(source);
        if path.is_absolute() {
            ThemeSource::File(path)
        } else {
            ThemeSource::File(base_dir.join(path))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl ThemeCatalog {
    pub fn new(themes: Vec<Theme>) -> Self {
        Self { themes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of themes.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let themes: Vec<Theme> = serde_json::from_str(json)?;
        Ok(Self { themes })
    }

    pub fn read_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub async fn fetch(url: &Url) -> Result<Self, CatalogError> {
        let client = Client::new();
        let resp = client.get(url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(CatalogError::Status(resp.status().as_u16()));
        }
        let body = resp.text().await?;
        Self::from_json(&body)
    }

    /// Load from `source`, degrading to an empty catalog on any failure.
    pub async fn load(source: &ThemeSource) -> Self {
        let result = match source {
            ThemeSource::File(path) => Self::read_file(path),
            ThemeSource::Url(url) => Self::fetch(url).await,
        };
        match result {
            Ok(catalog) => {
                info!(count = catalog.len(), "loaded theme catalog");
                catalog
            }
            Err(e) => {
                error!(error = %e, source = ?source, "failed to load theme catalog");
                Self::empty()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
