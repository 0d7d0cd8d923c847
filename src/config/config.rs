use crate::data::pagination::PageInfo;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub pagination: PaginationConfig,
    pub labels: LabelConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Rows per page when the table is created
    pub page_size: usize,

    /// Choices offered by the rows-per-page selector
    pub page_size_options: Vec<usize>,
}

/// Text shown by the table chrome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub caption: String,
    pub next: String,
    pub prev: String,
    pub first: String,
    pub last: String,
    pub empty_data: String,
    pub loading: String,
    pub error: String,
    pub page_size: String,
    pub page: String,
    pub rows: String,
    pub select: String,
    pub select_all: String,
    pub search: String,
    pub sort: String,
    pub filter: String,
    pub actions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Host performs search/filtering; local search only runs on request
    pub is_async: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationConfig::default(),
            labels: LabelConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            page_size_options: vec![5, 10, 20, 50],
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            caption: "Data table".to_string(),
            next: "Next".to_string(),
            prev: "Previous".to_string(),
            first: "First".to_string(),
            last: "Last".to_string(),
            empty_data: "No data".to_string(),
            loading: "Loading...".to_string(),
            error: "Error".to_string(),
            page_size: "Rows per page".to_string(),
            page: "Page".to_string(),
            rows: "Rows".to_string(),
            select: "Select".to_string(),
            select_all: "Select all".to_string(),
            search: "Search".to_string(),
            sort: "Sort".to_string(),
            filter: "Filter".to_string(),
            actions: "Actions".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self { is_async: false }
    }
}

impl LabelConfig {
    /// Footer text, e.g. "Page 1 - 5 (12 Rows)"
    pub fn format_page_info(&self, info: &PageInfo) -> String {
        format!(
            "{} {} - {} ({} {})",
            self.page, info.start, info.end, info.total, self.rows
        )
    }
}

impl TableConfig {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from_path(&config_path)
    }

    /// Load config from an explicit file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: TableConfig = toml::from_str(&contents)?;

        if config.pagination.page_size == 0 {
            config.pagination.page_size = PaginationConfig::default().page_size;
        }

        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("bt-table").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# bt-table Configuration File
# Location: ~/.config/bt-table/config.toml (Linux)
#           ~/Library/Application Support/bt-table/config.toml (macOS)
#           %APPDATA%\bt-table\config.toml (Windows)

[pagination]
# Rows per page when a table is created
page_size = 5

# Choices offered by the rows-per-page selector
page_size_options = [5, 10, 20, 50]

[behavior]
# Let the host do search/filtering (server-driven tables).
# Local search then only runs when explicitly requested.
is_async = false

# Text used by the table chrome
[labels]
caption = "Data table"
next = "Next"
prev = "Previous"
first = "First"
last = "Last"
empty_data = "No data"
loading = "Loading..."
error = "Error"
page_size = "Rows per page"
page = "Page"
rows = "Rows"
select = "Select"
select_all = "Select all"
search = "Search"
sort = "Sort"
filter = "Filter"
actions = "Actions"
"#
        .to_string()
    }
}
