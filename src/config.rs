use std::{fs, path::{Path, PathBuf}};
use serde::{Serialize, Deserialize};
use anyhow::{self, Context};

use crate::backend::json_store::DEFAULT_KEY;
use crate::core::{Category, CategoryCatalog};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub key: String
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig { data_dir: PathBuf::from("tally-data"), key: DEFAULT_KEY.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesConfig {
    pub expense: Vec<Category>,
    pub income: Vec<Category>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub categories: Option<CategoriesConfig>
}

impl AppConfig {
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_content = fs::read_to_string(filepath)
            .with_context(|| "failed to read config file")?;
        return AppConfig::parse(&file_content);
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .with_context(|| "failed to parse config file")?;
        config.catalog()?;
        return Ok(config);
    }

    /// The configured catalog, or the built-in one when none is given.
    pub fn catalog(&self) -> anyhow::Result<CategoryCatalog> {
        match &self.categories {
            Some(categories) => CategoryCatalog::new(categories.expense.clone(), categories.income.clone())
                .with_context(|| "invalid category catalog"),
            None => Ok(CategoryCatalog::default())
        }
    }
}
