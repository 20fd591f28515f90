use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WeightUnit {
    Lb,
    Kg,
}

impl WeightUnit {
    /// Weights are stored in pounds; this only affects display.
    pub fn display(&self, lb: f64) -> String {
        match self {
            WeightUnit::Lb => format!("{lb:.0} lb"),
            WeightUnit::Kg => format!("{:.1} kg", lb * 0.453_592_37),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub weight_unit: WeightUnit,
    /// Used when an exercise doesn't configure its own rest time.
    pub default_rest_secs: u32,
    /// Step added by the `extend` command during a rest countdown.
    pub rest_extend_secs: u32,
    /// Move to the next exercise automatically when the rest timer fires
    /// and the current exercise has all its target sets.
    pub auto_advance: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Lb,
            default_rest_secs: 90,
            rest_extend_secs: 30,
            auto_advance: true,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "liftlog") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("liftlog_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
