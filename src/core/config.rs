//! TOML configuration with typed sections.
//!
//! Each section type implements [`Configurable`] and is read from the table
//! named by its `PREFIX`; a missing section yields the type's default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::core::{
    client::BotUser,
    error::{Error, Result},
};

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be loaded from configuration
///
/// # Example
///
/// ```ignore
/// use serde::Deserialize;
/// use ayiou_help::core::config::Configurable;
///
/// #[derive(Debug, Deserialize, Default)]
/// pub struct GreeterConfig {
///     pub greeting: String,
/// }
///
/// impl Configurable for GreeterConfig {
///     const PREFIX: &'static str = "greeter";
/// }
/// ```
pub trait Configurable: DeserializeOwned + Default {
    /// Name of the TOML table this section is read from.
    const PREFIX: &'static str;
}

// ============================================================================
// Configuration Store
// ============================================================================

pub struct ConfigStore {
    data: toml::Value,
    path: Option<PathBuf>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigStore {
    pub fn empty() -> Self {
        Self {
            data: toml::Value::Table(Default::default()),
            path: None,
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let data: toml::Value = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse TOML: {}", e)))?;
        Ok(Self { data, path: None })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;

        let mut store = Self::parse(&content)?;
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    /// Typed section; defaults when the section is absent.
    pub fn get<C: Configurable>(&self) -> Result<C> {
        let section = self
            .data
            .get(C::PREFIX)
            .cloned()
            .unwrap_or(toml::Value::Table(Default::default()));

        debug!("Loading config section: {}", C::PREFIX);

        section.try_into().map_err(|e| {
            Error::Config(format!("invalid section '{}': {}", C::PREFIX, e))
        })
    }

    pub fn has_section(&self, prefix: &str) -> bool {
        self.data.get(prefix).is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Values from `other` win.
    pub fn merge(&mut self, other: &ConfigStore) {
        merge_toml_values(&mut self.data, &other.data);
    }
}

fn merge_toml_values(base: &mut toml::Value, other: &toml::Value) {
    match (base, other) {
        (toml::Value::Table(base_table), toml::Value::Table(other_table)) => {
            for (key, value) in other_table {
                if let Some(base_value) = base_table.get_mut(key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key.clone(), value.clone());
                }
            }
        }
        (base, other) => {
            *base = other.clone();
        }
    }
}

// ============================================================================
// Bot section
// ============================================================================

/// `[bot]` section: identity and command prefixes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub username: String,
    pub user_id: u64,
    pub prefixes: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            username: "Ayiou".to_string(),
            user_id: 0,
            prefixes: vec!["!".to_string()],
        }
    }
}

impl BotConfig {
    pub fn user(&self) -> BotUser {
        BotUser::new(self.user_id, self.username.clone())
    }
}

impl Configurable for BotConfig {
    const PREFIX: &'static str = "bot";
}
