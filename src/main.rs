use std::env;
use std::fs::create_dir_all;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use osm_street_map::config::{load_user_config, UserConfig};
use osm_street_map::errors::Result;
use osm_street_map::etl::parse_osm::ParseOsmEtl;
use osm_street_map::etl::Etl;
use osm_street_map::StreetMap;

const DEFAULT_CONFIG_PATH: &str = "config/map.json";

fn create_output_dir(config: &UserConfig) -> Result<PathBuf> {
    let input_fname = Path::new(&config.data_path)
        .file_name()
        .ok_or("Could not get input file name")?;
    let output_dir = Path::new(&config.dest_path).join(input_fname);
    create_dir_all(&output_dir)?;
    Ok(output_dir)
}

fn setup_logging(level: &str) {
    Builder::with_level(level)
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let user_config = load_user_config(Path::new(&config_path))?;
    setup_logging(&user_config.log_level);

    let output_dir = create_output_dir(&user_config)?;
    let mut etl = ParseOsmEtl::new(&user_config);
    etl.process(&output_dir)?;

    if let Some(map) = etl.into_map() {
        info!(nodes = map.node_count(), ways = map.way_count(); "Map loaded");
    }

    Ok(())
}
