use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::bbox::Bbox;
use crate::error::ProcessError;
use crate::filename::FilenameDescriptor;
use crate::stats::Summary;

/// Statistics over the bounding-box subset of a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubsetOutcome {
    Extracted {
        bbox: Bbox,
        summary: Summary,
        /// Total biomass in the region, mean biomass files only.
        total: Option<f64>,
    },
    /// The box did not intersect the raster; the full-grid statistics still stand.
    Skipped { bbox: Bbox, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: String,
    pub descriptor: FilenameDescriptor,
    pub upper_left: (f64, f64),
    pub lower_right: (f64, f64),
    /// Cells replaced by NaN during cleaning.
    pub replaced: usize,
    pub summary: Summary,
    /// Total biomass over the whole grid, mean biomass files only.
    pub total: Option<f64>,
    pub subset: Option<SubsetOutcome>,
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variable = &self.descriptor.variable;
        writeln!(f, "{}", self.path)?;
        writeln!(
            f,
            "  Variable: {} ({}) units: {} sentinel: {} replaced: {}",
            variable.code, variable.readable_name, variable.units, variable.sentinel, self.replaced
        )?;
        write!(
            f,
            "  Mission weeks: {} resolution: {}",
            self.descriptor.mission_timeframe, self.descriptor.spatial_resolution
        )?;
        match self.descriptor.cell_size_m() {
            Some(cell) => writeln!(f, " ({} m cells)", cell)?,
            None => writeln!(f)?,
        }
        writeln!(
            f,
            "  Extent: upper-left {:?} lower-right {:?}",
            self.upper_left, self.lower_right
        )?;
        writeln!(f, "  {}", self.summary)?;
        if let Some(total) = self.total {
            writeln!(f, "  Total: {} {}", total, variable.units)?;
        }

        match &self.subset {
            Some(SubsetOutcome::Extracted {
                bbox,
                summary,
                total,
            }) => {
                writeln!(f, "  Subset {}", bbox)?;
                writeln!(f, "    {}", summary)?;
                if let Some(total) = total {
                    writeln!(f, "    Total: {} {}", total, variable.units)?;
                }
            }
            Some(SubsetOutcome::Skipped { bbox, reason }) => {
                writeln!(f, "  Subset {} skipped: {}", bbox, reason)?;
            }
            None => {}
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub kind: &'static str,
    pub message: String,
}

impl FileFailure {
    pub fn new(path: impl Into<String>, err: &ProcessError) -> Self {
        Self {
            path: path.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub reports: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_files(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    /// Successful files per variable code.
    pub fn variable_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for report in &self.reports {
            *counts.entry(report.descriptor.variable.code).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> BatchSummary<'_> {
        BatchSummary(self)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            write!(f, "{}", report)?;
        }
        for failure in &self.failures {
            writeln!(f, "{}", failure.path)?;
            writeln!(f, "  FAILED ({}): {}", failure.kind, failure.message)?;
        }
        Ok(())
    }
}

/// Condensed batch overview printed with `--summary`.
pub struct BatchSummary<'a>(&'a BatchReport);

impl fmt::Display for BatchSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let batch = self.0;
        let elapsed = batch.finished_at - batch.started_at;
        writeln!(
            f,
            "Processed {} of {} files ({} failed) in {:.3}s",
            batch.reports.len(),
            batch.total_files(),
            batch.failures.len(),
            elapsed.num_milliseconds() as f64 / 1000.0
        )?;
        for (code, count) in batch.variable_counts() {
            writeln!(f, "  {}: {}", code, count)?;
        }
        for failure in &batch.failures {
            writeln!(f, "  failed {}: {}", failure.path, failure.kind)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::VariableRegistry;
    use crate::stats::summarize;
    use ndarray::array;

    fn report(name: &str) -> FileReport {
        let registry = VariableRegistry::gedi_l4b();
        let descriptor = FilenameDescriptor::parse(name, &registry).unwrap();
        let summary = summarize(&array![[f64::NAN, 10.0], [20.0, f64::NAN]]);
        let total = descriptor.variable.is_mean_biomass().then_some(summary.sum);

        FileReport {
            path: name.to_string(),
            descriptor,
            upper_left: (-113.0, 37.0),
            lower_right: (-109.0, 31.0),
            replaced: 2,
            summary,
            total,
            subset: None,
        }
    }

    fn batch(reports: Vec<FileReport>, failures: Vec<FileFailure>) -> BatchReport {
        let now = Utc::now();
        BatchReport {
            started_at: now,
            finished_at: now,
            reports,
            failures,
        }
    }

    #[test]
    fn test_mean_biomass_report_shows_total() {
        let text = report("GEDI04_B_035_02_002_003_01km_MU.tif").to_string();

        assert!(text.contains("Variable: MU (Mean)"));
        assert!(text.contains("Total: 30 Mg ha-1"));
    }

    #[test]
    fn test_resolution_line_shows_cell_size() {
        let text = report("GEDI04_B_035_02_002_003_01km_MU.tif").to_string();
        assert!(text.contains("Mission weeks: 035 resolution: 01km (1000 m cells)\n"));

        let text = report("GEDI04_B_035_02_002_003_R01000M_MU.tif").to_string();
        assert!(text.contains("Mission weeks: 035 resolution: R01000M\n"));
    }

    #[test]
    fn test_other_variables_have_no_total() {
        let report = report("GEDI04_B_035_02_002_003_01km_SE.tif");

        assert!(report.total.is_none());
        assert!(!report.to_string().contains("Total:"));
    }

    #[test]
    fn test_skipped_subset_is_reported() {
        let mut report = report("GEDI04_B_035_02_002_003_01km_MU.tif");
        report.subset = Some(SubsetOutcome::Skipped {
            bbox: Bbox::new(0.0, 1.0, 0.0, 1.0).unwrap(),
            reason: "does not intersect".to_string(),
        });

        assert!(report.to_string().contains("skipped: does not intersect"));
    }

    #[test]
    fn test_batch_summary() {
        let failure = FileFailure::new(
            "bad.tif",
            &ProcessError::MalformedFilename {
                name: "bad.tif".to_string(),
                found: 1,
            },
        );
        let batch = batch(
            vec![
                report("GEDI04_B_035_02_002_003_01km_MU.tif"),
                report("GEDI04_B_035_02_002_003_01km_SE.tif"),
                report("GEDI04_B_036_02_002_003_01km_MU.tif"),
            ],
            vec![failure],
        );

        assert!(!batch.is_success());
        assert_eq!(batch.total_files(), 4);
        assert_eq!(batch.variable_counts().get("MU"), Some(&2));
        assert_eq!(batch.variable_counts().get("SE"), Some(&1));

        let text = batch.summary().to_string();
        assert!(text.starts_with("Processed 3 of 4 files (1 failed)"));
        assert!(text.contains("failed bad.tif: malformed_filename"));
    }

    #[test]
    fn test_json_output() {
        let batch = batch(vec![report("GEDI04_B_035_02_002_003_01km_MU.tif")], vec![]);
        let json = serde_json::to_value(&batch).unwrap();

        let first = &json["reports"][0];
        assert_eq!(first["descriptor"]["variable"]["code"], "MU");
        assert_eq!(first["descriptor"]["variable"]["units"], "Mg ha-1");
        assert_eq!(first["summary"]["mean"], 15.0);
        assert_eq!(first["total"], 30.0);
        assert!(json["failures"].as_array().unwrap().is_empty());
    }
}
