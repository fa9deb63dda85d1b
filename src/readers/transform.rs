use serde::Serialize;

use super::types::{PixelWindow, ReadError};
use crate::bbox::Bbox;

/// GDAL-style affine transform:
/// `[top_left_x, pixel_width, row_rotation, top_left_y, col_rotation, pixel_height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoTransform(pub [f64; 6]);

impl GeoTransform {
    pub fn north_up(top_left_x: f64, top_left_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self([top_left_x, pixel_width, 0.0, top_left_y, 0.0, -pixel_height.abs()])
    }

    /// From GeoTIFF `ModelTiepoint` (I, J, K, X, Y, Z) and `ModelPixelScale` (Sx, Sy, Sz).
    pub fn from_tiepoint(tiepoint: &[f64], scale: &[f64]) -> Result<Self, ReadError> {
        if tiepoint.len() < 6 || scale.len() < 2 {
            return Err(ReadError::Georeference(format!(
                "expected 6 tie-point and 2 scale values, got {} and {}",
                tiepoint.len(),
                scale.len()
            )));
        }
        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
        let (sx, sy) = (scale[0], scale[1]);

        Ok(Self([x - i * sx, sx, 0.0, y + j * sy, 0.0, -sy]))
    }

    /// From a row-major 4x4 GeoTIFF `ModelTransformation` matrix.
    pub fn from_model_transformation(m: &[f64]) -> Result<Self, ReadError> {
        if m.len() < 16 {
            return Err(ReadError::Georeference(format!(
                "expected 16 transformation values, got {}",
                m.len()
            )));
        }

        Ok(Self([m[3], m[0], m[1], m[7], m[4], m[5]]))
    }

    pub fn is_north_up(&self) -> bool {
        self.0[2] == 0.0 && self.0[4] == 0.0
    }

    pub fn pixel_to_geo(&self, row: usize, col: usize) -> (f64, f64) {
        let gt = &self.0;
        let (col, row) = (col as f64, row as f64);
        (
            gt[0] + col * gt[1] + row * gt[2],
            gt[3] + col * gt[4] + row * gt[5],
        )
    }

    /// Bounding box of the four raster corners.
    pub fn extent(&self, shape: (usize, usize)) -> Bbox {
        let (rows, cols) = shape;
        let corners = [
            self.pixel_to_geo(0, 0),
            self.pixel_to_geo(0, cols),
            self.pixel_to_geo(rows, 0),
            self.pixel_to_geo(rows, cols),
        ];

        let mut extent = Bbox {
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
        };
        for (x, y) in corners {
            extent.xmin = extent.xmin.min(x);
            extent.xmax = extent.xmax.max(x);
            extent.ymin = extent.ymin.min(y);
            extent.ymax = extent.ymax.max(y);
        }

        extent
    }

    /// Pixels touched by `bbox`, clipped to a raster of `shape` (rows, cols).
    pub fn window_for(&self, bbox: &Bbox, shape: (usize, usize)) -> Result<PixelWindow, ReadError> {
        if !self.is_north_up() {
            return Err(ReadError::Georeference(
                "rotated geotransforms are not supported for windowed reads".to_string(),
            ));
        }

        let gt = &self.0;
        let (rows, cols) = shape;

        let col_a = (bbox.xmin - gt[0]) / gt[1];
        let col_b = (bbox.xmax - gt[0]) / gt[1];
        let row_a = (bbox.ymax - gt[3]) / gt[5];
        let row_b = (bbox.ymin - gt[3]) / gt[5];

        let clamp = |v: f64, max: usize| v.max(0.0).min(max as f64) as usize;

        let col_start = clamp(col_a.min(col_b).floor(), cols);
        let col_end = clamp(col_a.max(col_b).ceil(), cols);
        let row_start = clamp(row_a.min(row_b).floor(), rows);
        let row_end = clamp(row_a.max(row_b).ceil(), rows);

        if col_end <= col_start || row_end <= row_start {
            return Err(ReadError::OutOfBounds {
                requested: bbox.clone(),
                extent: self.extent(shape),
            });
        }

        Ok(PixelWindow {
            row_off: row_start,
            col_off: col_start,
            rows: row_end - row_start,
            cols: col_end - col_start,
        })
    }
}
