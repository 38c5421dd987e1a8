use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::info;
use xz::bufread::XzDecoder;

use crate::config::UserConfig;
use crate::data::summary::MapSummary;
use crate::data::{OsmMap, StreetMap};
use crate::errors::Result;
use crate::etl::Etl;

pub const ETL_NAME: &str = "parse_osm";
pub const OUTPUT_FILE_NAME: &str = "map_summary.json";

/// Reads the configured .osm (or .osm.xz) file into an [`OsmMap`] and writes
/// its [`MapSummary`] to the output directory.
pub struct ParseOsmEtl<'a> {
    config: &'a UserConfig,
    map: Option<OsmMap>,
}

impl ParseOsmEtl<'_> {
    fn output_path(dir: &Path) -> PathBuf {
        dir.join(OUTPUT_FILE_NAME)
    }

    fn create_osm_reader(&self) -> Result<Box<dyn BufRead>> {
        let path = Path::new(&self.config.data_path);
        let file_reader = BufReader::new(fs::File::open(path)?);

        if path.extension().is_some_and(|ext| ext == "xz") {
            let xz_reader = XzDecoder::new(file_reader);
            Ok(Box::new(BufReader::new(xz_reader)))
        } else {
            Ok(Box::new(file_reader))
        }
    }

    pub fn new(config: &UserConfig) -> ParseOsmEtl<'_> {
        ParseOsmEtl {
            config,
            map: None,
        }
    }

    /// The map built by the last uncached run, if any.
    pub fn into_map(self) -> Option<OsmMap> {
        self.map
    }
}

impl Etl for ParseOsmEtl<'_> {
    type Input = Box<dyn BufRead>;
    type Output = OsmMap;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        Ok(Self::output_path(dir).try_exists()?)
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        if self.is_cached(dir)? {
            fs::remove_file(Self::output_path(dir))?;
        }
        Ok(())
    }

    fn extract(&mut self, _dir: &Path) -> Result<Self::Input> {
        self.create_osm_reader()
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        OsmMap::from_reader(input)
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        let summary = MapSummary::from_map(&output);
        let output_file = fs::File::create(Self::output_path(dir))?;
        serde_json::to_writer_pretty(output_file, &summary)?;

        info!(etl_name = ETL_NAME, nodes = output.node_count(), ways = output.way_count(); "Wrote map summary");
        self.map = Some(output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;
    use crate::data::osm::MapElement;
    use crate::errors::Error;

    const SAMPLE_OSM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="12.34" lon="56.78"><tag k="name" v="TestNode"/></node>
  <node id="2" lat="12.35" lon="56.79"/>
  <way id="101"><nd ref="1"/><nd ref="2"/><tag k="highway" v="residential"/></way>
</osm>
"#;

    #[fixture]
    fn workdir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn config_for(data_path: &Path) -> UserConfig {
        UserConfig {
            data_path: data_path.to_string_lossy().into_owned(),
            dest_path: "unused".to_string(),
            log_level: "info".to_string(),
        }
    }

    fn write_plain(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("sample.osm");
        fs::write(&path, contents).unwrap();
        path
    }

    fn write_xz(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("sample.osm.xz");
        let file = fs::File::create(&path).unwrap();
        let mut encoder = xz::write::XzEncoder::new(file, 6);
        encoder.write_all(contents.as_bytes()).unwrap();
        encoder.finish().unwrap();
        path
    }

    #[rstest]
    #[case::plain(false)]
    #[case::compressed(true)]
    fn process_writes_summary_and_keeps_map(workdir: TempDir, #[case] compressed: bool) {
        let input = if compressed {
            write_xz(workdir.path(), SAMPLE_OSM)
        } else {
            write_plain(workdir.path(), SAMPLE_OSM)
        };
        let config = config_for(&input);
        let mut etl = ParseOsmEtl::new(&config);

        etl.process(workdir.path()).unwrap();
        assert!(etl.is_cached(workdir.path()).unwrap());

        let summary: MapSummary =
            serde_json::from_reader(fs::File::open(workdir.path().join(OUTPUT_FILE_NAME)).unwrap()).unwrap();
        assert_eq!(summary.nodes, 2);
        assert_eq!(summary.ways, 1);
        assert_eq!(summary.tagged_nodes, 1);

        let map = etl.into_map().unwrap();
        assert_eq!(map.way_by_id(101).unwrap().attribute("highway"), "residential");
    }

    #[rstest]
    fn cached_run_skips_parsing(workdir: TempDir) {
        let input = write_plain(workdir.path(), SAMPLE_OSM);
        let config = config_for(&input);
        fs::write(workdir.path().join(OUTPUT_FILE_NAME), "{}").unwrap();

        let mut etl = ParseOsmEtl::new(&config);
        etl.process(workdir.path()).unwrap();
        assert!(etl.into_map().is_none());
    }

    #[rstest]
    fn clean_removes_summary(workdir: TempDir) {
        let input = write_plain(workdir.path(), SAMPLE_OSM);
        let config = config_for(&input);
        let mut etl = ParseOsmEtl::new(&config);

        etl.process(workdir.path()).unwrap();
        etl.clean(workdir.path()).unwrap();
        assert!(!etl.is_cached(workdir.path()).unwrap());
        etl.clean(workdir.path()).unwrap();
    }

    #[rstest]
    fn malformed_input_leaves_no_summary(workdir: TempDir) {
        let input = write_plain(workdir.path(), r#"<osm><node id="abc" lat="1" lon="2"/></osm>"#);
        let config = config_for(&input);
        let mut etl = ParseOsmEtl::new(&config);

        let err = etl.process(workdir.path()).unwrap_err();
        assert!(matches!(err, Error::MalformedField { .. }));
        assert!(!etl.is_cached(workdir.path()).unwrap());
    }

    #[rstest]
    fn missing_input_fails_extraction(workdir: TempDir) {
        let config = config_for(&workdir.path().join("missing.osm"));
        let mut etl = ParseOsmEtl::new(&config);

        assert!(matches!(etl.process(workdir.path()), Err(Error::Io(_))));
    }
}
