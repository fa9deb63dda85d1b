use ndarray::Array2;
use std::fmt;
use thiserror::Error;

use super::transform::GeoTransform;
use crate::bbox::Bbox;

/// Row-major raster values, indexed `[row, col]`.
pub type Grid = Array2<f64>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadError {
    #[error("{0}")]
    Unreadable(String),
    #[error("unsupported file type: {0}")]
    UnknownFileType(String),
    #[error("invalid georeferencing: {0}")]
    Georeference(String),
    #[error("bounding box {requested} does not intersect raster extent {extent}")]
    OutOfBounds { requested: Bbox, extent: Bbox },
}

/// A rectangular block of pixels, in raster coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub row_off: usize,
    pub col_off: usize,
    pub rows: usize,
    pub cols: usize,
}

impl PixelWindow {
    pub fn full(shape: (usize, usize)) -> Self {
        Self {
            row_off: 0,
            col_off: 0,
            rows: shape.0,
            cols: shape.1,
        }
    }

    pub fn row_end(&self) -> usize {
        self.row_off + self.rows
    }

    pub fn col_end(&self) -> usize {
        self.col_off + self.cols
    }

    pub fn fits(&self, shape: (usize, usize)) -> bool {
        self.row_end() <= shape.0 && self.col_end() <= shape.1
    }
}

impl fmt::Display for PixelWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows {}..{}, cols {}..{}",
            self.row_off,
            self.row_end(),
            self.col_off,
            self.col_end()
        )
    }
}

/// Raster-reading capability consumed by the cleaning pipeline.
pub trait RasterSource {
    /// `(rows, cols)`.
    fn shape(&self) -> (usize, usize);

    fn geo_transform(&self) -> &GeoTransform;

    fn read_full(&self) -> Result<Grid, ReadError>;

    fn read_pixels(&self, window: &PixelWindow) -> Result<Grid, ReadError>;

    /// Read only the cells covered by `bbox`; partial overlap is clipped to the raster.
    fn read_window(&self, bbox: &Bbox) -> Result<Grid, ReadError> {
        let window = self.geo_transform().window_for(bbox, self.shape())?;
        log::debug!("Window for {}: {}", bbox, window);
        self.read_pixels(&window)
    }

    /// (lon, lat) of the upper-left corner of a pixel.
    fn pixel_to_geo(&self, row: usize, col: usize) -> (f64, f64) {
        self.geo_transform().pixel_to_geo(row, col)
    }

    fn extent(&self) -> Bbox {
        self.geo_transform().extent(self.shape())
    }
}
