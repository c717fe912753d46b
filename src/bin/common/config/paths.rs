use std::fs;
use std::path::{Path, PathBuf};

use serde_derive::{Deserialize, Serialize};
use woe::error::{ClimateError, ClimateResult, Stage};

/// Directory layout of a project, rooted at `project_path`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPaths {
    pub project_path: PathBuf,
}

impl Default for ProjectPaths {
    fn default() -> Self {
        ProjectPaths {
            project_path: PathBuf::from("."),
        }
    }
}

impl ProjectPaths {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        ProjectPaths {
            project_path: project_path.into(),
        }
    }

    pub fn data_path(&self) -> PathBuf {
        self.project_path.join("data")
    }

    /// raw downloads
    pub fn downloads_path(&self) -> PathBuf {
        self.data_path().join("downloads")
    }

    pub fn era5_downloads_path(&self) -> PathBuf {
        self.downloads_path().join("era5")
    }

    pub fn smard_downloads_path(&self) -> PathBuf {
        self.downloads_path().join("smard")
    }

    /// Natural Earth boundaries converted to GeoJSON
    pub fn naturalearth_downloads_path(&self) -> PathBuf {
        self.downloads_path().join("naturalearth")
    }

    pub fn processed_data_path(&self) -> PathBuf {
        self.data_path().join("processed")
    }

    pub fn output_path(&self) -> PathBuf {
        self.project_path.join("output")
    }

    pub fn images_path(&self) -> PathBuf {
        self.output_path().join("images")
    }

    /// Relative input paths are looked up under the ERA5 downloads directory
    pub fn resolve_input(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.era5_downloads_path().join(p)
        }
    }

    /// Relative market data paths are looked up under the downloads directory
    pub fn resolve_download(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.downloads_path().join(p)
        }
    }

    /// Relative region outlines are looked up under the Natural Earth downloads
    pub fn resolve_shape(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.naturalearth_downloads_path().join(p)
        }
    }

    /// Relative output directories live under the processed data directory
    pub fn resolve_output(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.processed_data_path().join(p)
        }
    }

    pub fn ensure_directories(&self) -> ClimateResult<()> {
        for dir in [
            self.downloads_path(),
            self.era5_downloads_path(),
            self.smard_downloads_path(),
            self.processed_data_path(),
            self.images_path(),
        ] {
            fs::create_dir_all(&dir).map_err(|err| {
                ClimateError::new(
                    Stage::Config,
                    format!("cannot create directory {}: {err}", dir.display()),
                )
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_at_the_project() {
        let paths = ProjectPaths::new("/srv/woe");
        assert_eq!(paths.images_path(), PathBuf::from("/srv/woe/output/images"));
        assert_eq!(
            paths.resolve_input("era5_sl_climate.nc"),
            PathBuf::from("/srv/woe/data/downloads/era5/era5_sl_climate.nc")
        );
        assert_eq!(paths.resolve_input("/tmp/msl.json"), PathBuf::from("/tmp/msl.json"));
        assert_eq!(
            paths.resolve_shape("ne_10m_admin_0_countries.geojson"),
            PathBuf::from("/srv/woe/data/downloads/naturalearth/ne_10m_admin_0_countries.geojson")
        );
        assert_eq!(
            paths.resolve_download("investing_com/carbon_emissions_futures.csv"),
            PathBuf::from("/srv/woe/data/downloads/investing_com/carbon_emissions_futures.csv")
        );
        assert_eq!(
            paths.resolve_output("nao"),
            PathBuf::from("/srv/woe/data/processed/nao")
        );
    }
}
