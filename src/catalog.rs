//! The fixed set of application screenshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the six known application screenshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScreenshotKey {
    #[serde(rename = "01_dashboard")]
    Dashboard,
    #[serde(rename = "02_stock_level")]
    StockLevel,
    #[serde(rename = "03_inventory")]
    Inventory,
    #[serde(rename = "04_analytics")]
    Analytics,
    #[serde(rename = "05_settings")]
    Settings,
    #[serde(rename = "06_alerts")]
    Alerts,
}

impl ScreenshotKey {
    /// Every key, in showcase order.
    pub const ALL: [ScreenshotKey; 6] = [
        ScreenshotKey::Dashboard,
        ScreenshotKey::StockLevel,
        ScreenshotKey::Inventory,
        ScreenshotKey::Analytics,
        ScreenshotKey::Settings,
        ScreenshotKey::Alerts,
    ];

    /// Symbolic name, e.g. `01_dashboard`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenshotKey::Dashboard => "01_dashboard",
            ScreenshotKey::StockLevel => "02_stock_level",
            ScreenshotKey::Inventory => "03_inventory",
            ScreenshotKey::Analytics => "04_analytics",
            ScreenshotKey::Settings => "05_settings",
            ScreenshotKey::Alerts => "06_alerts",
        }
    }

    /// Human-readable label shown under the image in the showcase.
    pub fn label(&self) -> &'static str {
        match self {
            ScreenshotKey::Dashboard => "Dashboard",
            ScreenshotKey::StockLevel => "Stock Level",
            ScreenshotKey::Inventory => "Inventory",
            ScreenshotKey::Analytics => "Analytics",
            ScreenshotKey::Settings => "Settings",
            ScreenshotKey::Alerts => "Alerts",
        }
    }

    /// File name the screenshot was captured under.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ScreenshotKey::Dashboard => "01_dashboard_1765989751219.png",
            ScreenshotKey::StockLevel => "02_stock_level_1765989794917.png",
            ScreenshotKey::Inventory => "03_inventory_table_1765989919002.png",
            ScreenshotKey::Analytics => "04_analytics_1765989960070.png",
            ScreenshotKey::Settings => "05_settings_1765990030067.png",
            ScreenshotKey::Alerts => "06_alerts_1765990092950.png",
        }
    }
}

impl fmt::Display for ScreenshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key to file name mapping for the screenshots directory.
///
/// Every key always has a file name; overrides loaded from configuration
/// replace the defaults for the keys they mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<ScreenshotKey, String>", into = "BTreeMap<ScreenshotKey, String>")]
pub struct ScreenshotCatalog {
    files: BTreeMap<ScreenshotKey, String>,
}

impl Default for ScreenshotCatalog {
    fn default() -> Self {
        let files = ScreenshotKey::ALL
            .iter()
            .map(|key| (*key, key.default_file_name().to_string()))
            .collect();
        Self { files }
    }
}

impl From<BTreeMap<ScreenshotKey, String>> for ScreenshotCatalog {
    fn from(overrides: BTreeMap<ScreenshotKey, String>) -> Self {
        let mut catalog = Self::default();
        catalog.files.extend(overrides);
        catalog
    }
}

impl From<ScreenshotCatalog> for BTreeMap<ScreenshotKey, String> {
    fn from(catalog: ScreenshotCatalog) -> Self {
        catalog.files
    }
}

impl ScreenshotCatalog {
    pub fn file_name(&self, key: ScreenshotKey) -> &str {
        self.files
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_file_name())
    }

    /// Full path of a screenshot inside `dir`.
    pub fn path_in(&self, dir: &Path, key: ScreenshotKey) -> PathBuf {
        dir.join(self.file_name(key))
    }
}
