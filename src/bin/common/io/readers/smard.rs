use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use woe::{
    error::{ClimateError, ClimateResult, Stage},
    models::series::TimeSeries,
    modules::market::{
        config::{SmardResolution, SmardVariable},
        functions::{merge_smard_blocks, parse_smard_block, parse_smard_index},
    },
};

/// Local mirror of the SMARD chart data tree,
/// `<root>/<variable id>/<region>/index_<resolution>.json` next to the blocks
#[derive(Debug, Clone)]
pub struct SmardArchive {
    root: PathBuf,
}

fn read_text(path: &Path) -> ClimateResult<String> {
    fs::read_to_string(path)
        .map_err(|err| ClimateError::new(Stage::Input, format!("cannot read {}: {err}", path.display())))
}

impl SmardArchive {
    pub fn new(root: PathBuf) -> Self {
        SmardArchive { root }
    }

    fn series_dir(&self, variable: SmardVariable, region: &str) -> PathBuf {
        self.root.join(variable.id().to_string()).join(region)
    }

    /// All published values of a variable. Blocks listed in the index but
    /// missing on disk are skipped with a warning.
    pub fn read(&self, variable: SmardVariable, region: &str, resolution: SmardResolution) -> ClimateResult<TimeSeries> {
        let dir = self.series_dir(variable, region);
        let index = parse_smard_index(&read_text(&dir.join(SmardVariable::index_file(resolution)))?)?;

        let mut blocks = Vec::with_capacity(index.timestamps.len());
        for timestamp in &index.timestamps {
            let file = dir.join(variable.block_file(region, resolution, *timestamp));
            if !file.is_file() {
                warn!("{variable}: block {} is missing", file.display());
                continue;
            }
            blocks.push(parse_smard_block(&read_text(&file)?)?);
        }
        let series = merge_smard_blocks(&blocks)?;
        if series.is_empty() {
            return Err(ClimateError::new(
                Stage::Input,
                format!("{variable} ({region}, {resolution}): no value in {}", dir.display()),
            ));
        }
        debug!(
            "{variable} ({region}, {resolution}): {} values from {} blocks",
            series.len(),
            blocks.len()
        );
        Ok(series)
    }
}
