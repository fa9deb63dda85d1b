use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::bbox::Bbox;
use crate::readers::Backend;
use crate::registry::{MEAN_BIOMASS, VariableRegistry};

pub mod error;
pub use error::ConfigError;

pub const DATAFILE_PATTERN: &str = "*.tif";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    bbox: Option<Bbox>,
    target_variable: String,
    backend: Backend,
    pattern: String,
    recursive: bool,
}

// Deserializes a Config, checking the bbox ranges, the target variable code and the pattern.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            bbox: Option<BboxHelper>,
            target_variable: Option<String>,
            backend: Option<Backend>,
            pattern: Option<String>,
            recursive: Option<bool>,
        }

        #[derive(Deserialize)]
        struct BboxHelper {
            xmin: f64,
            xmax: f64,
            ymin: f64,
            ymax: f64,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let bbox = if let Some(b) = helper.bbox {
            Some(
                Bbox::new(b.xmin, b.xmax, b.ymin, b.ymax)
                    .map_err(|e| D::Error::custom(ConfigError::Bbox(e)))?,
            )
        } else {
            None
        };

        let target_variable = helper
            .target_variable
            .unwrap_or_else(|| MEAN_BIOMASS.to_string());
        if !VariableRegistry::gedi_l4b().contains(&target_variable) {
            return Err(D::Error::custom(ConfigError::TargetVariable(
                target_variable,
            )));
        }

        let pattern = helper
            .pattern
            .unwrap_or_else(|| DATAFILE_PATTERN.to_string());
        if pattern.trim().is_empty() {
            return Err(D::Error::custom(ConfigError::EmptyPattern));
        }

        Ok(Config {
            bbox,
            target_variable,
            backend: helper.backend.unwrap_or_default(),
            pattern,
            recursive: helper.recursive.unwrap_or(false),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bbox: None,
            target_variable: MEAN_BIOMASS.to_string(),
            backend: Backend::default(),
            pattern: DATAFILE_PATTERN.to_string(),
            recursive: false,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn bbox(&self) -> Option<&Bbox> {
        self.bbox.as_ref()
    }

    pub fn target_variable(&self) -> &str {
        &self.target_variable
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn with_bbox(mut self, bbox: Bbox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_target_variable(
        mut self,
        code: impl Into<String>,
        registry: &VariableRegistry,
    ) -> Result<Self, ConfigError> {
        let code = code.into();
        if !registry.contains(&code) {
            return Err(ConfigError::TargetVariable(code));
        }
        self.target_variable = code;
        Ok(self)
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}
