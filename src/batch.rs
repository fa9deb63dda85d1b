use chrono::Utc;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::bbox::Bbox;
use crate::cleaning::{clean, clean_in_place};
use crate::config::Config;
use crate::error::{ProcessError, Result};
use crate::filename::FilenameDescriptor;
use crate::readers::{self, RasterSource, ReadError};
use crate::registry::{Variable, VariableRegistry};
use crate::report::{BatchReport, FileFailure, FileReport, SubsetOutcome};
use crate::stats::summarize;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Unable to find file or directory {0}")]
    NotFound(String),
    #[error("Invalid file pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("No files found to process in {0}")]
    NoFiles(String),
}

/// Runs the parse, clean and summarize pipeline over a set of rasters.
///
/// A failing file is logged and recorded; the remaining files are still processed.
#[derive(Debug)]
pub struct BatchRunner<'a> {
    config: Config,
    registry: &'a VariableRegistry,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: Config, registry: &'a VariableRegistry) -> Self {
        BatchRunner { config, registry }
    }

    /// Expands `input` into the rasters to process, sorted by path.
    pub fn discover(&self, input: &Path) -> std::result::Result<Vec<PathBuf>, DiscoveryError> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }
        if !input.is_dir() {
            return Err(DiscoveryError::NotFound(input.display().to_string()));
        }

        let pattern = self.config.pattern();
        let matcher = glob::Pattern::new(pattern).map_err(|source| DiscoveryError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let max_depth = if self.config.recursive() { usize::MAX } else { 1 };
        let mut files = Self::search(input, &matcher, max_depth);

        if files.is_empty() {
            return Err(DiscoveryError::NoFiles(input.display().to_string()));
        }

        files.sort();
        Ok(files)
    }

    /// Only file names are matched, so the directory path is never read as a pattern.
    fn search(base_dir: &Path, matcher: &glob::Pattern, max_depth: usize) -> Vec<PathBuf> {
        WalkDir::new(base_dir)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| {
                entry.file_type().is_file()
                    && matcher.matches(&entry.file_name().to_string_lossy())
            })
            .map(|entry| entry.into_path())
            .collect()
    }

    pub fn run(&self, files: &[PathBuf]) -> BatchReport {
        let started_at = Utc::now();
        let mut reports = Vec::new();
        let mut failures = Vec::new();

        for path in files {
            let path_str = path.display().to_string();
            match self.process_file(path) {
                Ok(report) => {
                    info!("{}: {}", path_str, report.summary);
                    reports.push(report);
                }
                Err(e) => {
                    error!("Skipping {}: {}", path_str, e);
                    failures.push(FileFailure::new(path_str, &e));
                }
            }
        }

        info!(
            "Finished: {} succeeded, {} failed",
            reports.len(),
            failures.len()
        );

        BatchReport {
            started_at,
            finished_at: Utc::now(),
            reports,
            failures,
        }
    }

    pub fn process_file(&self, path: &Path) -> Result<FileReport> {
        let path_str = path.display().to_string();
        info!("Processing {}", path_str);

        let descriptor = FilenameDescriptor::parse(path, self.registry)?;
        debug!(
            "{}: variable {} ({}), sentinel {}",
            path_str,
            descriptor.variable_code(),
            descriptor.variable.readable_name,
            descriptor.sentinel()
        );

        let source = readers::create_source(path, self.config.backend())
            .map_err(|e| ProcessError::from_read(&path_str, e))?;
        self.summarize_source(path_str, descriptor, source.as_ref())
    }

    /// Clean and summarize an already opened raster whose filename has been parsed.
    pub fn summarize_source(
        &self,
        path: String,
        descriptor: FilenameDescriptor,
        source: &dyn RasterSource,
    ) -> Result<FileReport> {
        let variable = descriptor.variable;

        let mut grid = source
            .read_full()
            .map_err(|e| ProcessError::from_read(&path, e))?;
        let replaced = clean_in_place(&mut grid, variable.sentinel);
        let summary = summarize(&grid);

        let (rows, cols) = source.shape();
        let upper_left = source.pixel_to_geo(0, 0);
        let lower_right = source.pixel_to_geo(rows, cols);

        let subset = match self.config.bbox() {
            Some(bbox) if variable.code == self.config.target_variable() => {
                Some(self.subset(&path, source, bbox, &variable)?)
            }
            _ => None,
        };

        Ok(FileReport {
            path,
            upper_left,
            lower_right,
            replaced,
            total: variable.is_mean_biomass().then_some(summary.sum),
            summary,
            subset,
            descriptor,
        })
    }

    fn subset(
        &self,
        path: &str,
        source: &dyn RasterSource,
        bbox: &Bbox,
        variable: &Variable,
    ) -> Result<SubsetOutcome> {
        match source.read_window(bbox) {
            Ok(window) => {
                let cleaned = clean(&window, variable.sentinel);
                let summary = summarize(&cleaned);
                info!("{}: subset {}: {}", path, bbox, summary);
                Ok(SubsetOutcome::Extracted {
                    bbox: bbox.clone(),
                    total: variable.is_mean_biomass().then_some(summary.sum),
                    summary,
                })
            }
            Err(e @ ReadError::OutOfBounds { .. }) => {
                let reason = ProcessError::from_read(path, e).to_string();
                warn!("{}: skipping subset: {}", path, reason);
                Ok(SubsetOutcome::Skipped {
                    bbox: bbox.clone(),
                    reason,
                })
            }
            Err(e) => Err(ProcessError::from_read(path, e)),
        }
    }
}
