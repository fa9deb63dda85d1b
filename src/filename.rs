//! Metadata carried by GEDI L4B gridded product filenames.
//!
//! Files are named
//! `GEDI04_B_<mission weeks>_<ppds>_<release>_<product version>_<spatial resolution>_<variable>.tif`,
//! and the variable component alone decides how pixel values are interpreted.

use serde::Serialize;
use std::path::Path;

use crate::error::{ProcessError, Result};
use crate::registry::{Variable, VariableRegistry};

pub const FILENAME_DELIMITER: char = '_';
pub const FILENAME_COMPONENTS: usize = 8;

const POSITION_PRODUCT: usize = 0;
const POSITION_LEVEL: usize = 1;
const POSITION_MISSION_TIMEFRAME: usize = 2;
const POSITION_PPDS: usize = 3;
const POSITION_RELEASE: usize = 4;
const POSITION_PRODUCT_VERSION: usize = 5;
const POSITION_SPATIAL: usize = 6;
const POSITION_TYPE: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilenameDescriptor {
    pub product: String,
    pub level: String,
    pub mission_timeframe: String,
    pub ppds: String,
    pub release: String,
    pub product_version: String,
    pub spatial_resolution: String,
    pub variable: Variable,
}

impl FilenameDescriptor {
    /// Parse a filename, with or without directory prefix; the extension is ignored.
    pub fn parse(file_name: impl AsRef<Path>, registry: &VariableRegistry) -> Result<Self> {
        let path = file_name.as_ref();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let comp: Vec<&str> = stem.split(FILENAME_DELIMITER).collect();
        if comp.len() != FILENAME_COMPONENTS {
            return Err(ProcessError::MalformedFilename {
                name: path.to_string_lossy().into_owned(),
                found: comp.len(),
            });
        }

        let variable = registry.resolve(comp[POSITION_TYPE])?;

        Ok(Self {
            product: comp[POSITION_PRODUCT].to_string(),
            level: comp[POSITION_LEVEL].to_string(),
            mission_timeframe: comp[POSITION_MISSION_TIMEFRAME].to_string(),
            ppds: comp[POSITION_PPDS].to_string(),
            release: comp[POSITION_RELEASE].to_string(),
            product_version: comp[POSITION_PRODUCT_VERSION].to_string(),
            spatial_resolution: comp[POSITION_SPATIAL].to_string(),
            variable,
        })
    }

    pub fn variable_code(&self) -> &'static str {
        self.variable.code
    }

    pub fn sentinel(&self) -> f64 {
        self.variable.sentinel
    }

    /// Grid cell size in metres, when the resolution reads like `01km` or `500m`.
    pub fn cell_size_m(&self) -> Option<f64> {
        let res = self.spatial_resolution.to_ascii_lowercase();
        if let Some(km) = res.strip_suffix("km") {
            km.parse::<f64>().ok().map(|v| v * 1000.0)
        } else {
            res.strip_suffix('m')?.parse::<f64>().ok()
        }
    }
}
