use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::errors::Result;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UserConfig {
    /// Source `.osm` file, optionally xz-compressed (`.osm.xz`).
    pub data_path: String,
    /// Root under which a per-input output directory is created.
    pub dest_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

pub fn load_user_config(path: &Path) -> Result<UserConfig> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
