use ndarray::s;

use super::transform::GeoTransform;
use super::{Grid, PixelWindow, RasterSource, ReadError};

/// A raster already held in memory, for callers that decode pixels themselves.
#[derive(Debug, Clone)]
pub struct MemorySource {
    grid: Grid,
    transform: GeoTransform,
}

impl MemorySource {
    pub fn new(grid: Grid, transform: GeoTransform) -> Self {
        Self { grid, transform }
    }
}

impl RasterSource for MemorySource {
    fn shape(&self) -> (usize, usize) {
        self.grid.dim()
    }

    fn geo_transform(&self) -> &GeoTransform {
        &self.transform
    }

    fn read_full(&self) -> Result<Grid, ReadError> {
        Ok(self.grid.clone())
    }

    fn read_pixels(&self, window: &PixelWindow) -> Result<Grid, ReadError> {
        if !window.fits(self.shape()) {
            return Err(ReadError::Unreadable(format!(
                "window {} exceeds raster shape {:?}",
                window,
                self.shape()
            )));
        }

        Ok(self
            .grid
            .slice(s![window.row_off..window.row_end(), window.col_off..window.col_end()])
            .to_owned())
    }
}
