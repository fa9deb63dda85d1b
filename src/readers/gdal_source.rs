use gdal::Dataset;
use std::path::Path;

use super::transform::GeoTransform;
use super::{Grid, PixelWindow, RasterSource, ReadError};

/// Raster opened through GDAL; windowed reads only fetch the requested block.
pub struct GdalSource {
    dataset: Dataset,
    transform: GeoTransform,
}

impl GdalSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let dataset = Dataset::open(path.as_ref())
            .map_err(|e| ReadError::Unreadable(format!("Failed to open dataset: {}", e)))?;
        Self::from_dataset(dataset)
    }

    pub fn from_dataset(dataset: Dataset) -> Result<Self, ReadError> {
        if dataset.raster_count() < 1 {
            return Err(ReadError::Unreadable("dataset has no raster bands".to_string()));
        }

        let geo_transform = dataset
            .geo_transform()
            .map_err(|e| ReadError::Georeference(e.to_string()))?;

        Ok(Self {
            dataset,
            transform: GeoTransform(geo_transform),
        })
    }
}

impl RasterSource for GdalSource {
    fn shape(&self) -> (usize, usize) {
        let (width, height) = self.dataset.raster_size();
        (height, width)
    }

    fn geo_transform(&self) -> &GeoTransform {
        &self.transform
    }

    fn read_full(&self) -> Result<Grid, ReadError> {
        self.read_pixels(&PixelWindow::full(self.shape()))
    }

    fn read_pixels(&self, window: &PixelWindow) -> Result<Grid, ReadError> {
        if !window.fits(self.shape()) {
            return Err(ReadError::Unreadable(format!(
                "window {} exceeds raster shape {:?}",
                window,
                self.shape()
            )));
        }

        let band = self
            .dataset
            .rasterband(1)
            .map_err(|e| ReadError::Unreadable(e.to_string()))?;

        let size = (window.cols, window.rows);
        let buffer = band
            .read_as::<f64>(
                (window.col_off as isize, window.row_off as isize),
                size,
                size,
                None,
            )
            .map_err(|e| ReadError::Unreadable(format!("Failed to read band: {}", e)))?;

        Grid::from_shape_vec((window.rows, window.cols), buffer.data().to_vec())
            .map_err(|e| ReadError::Unreadable(format!("Failed to reshape raster: {}", e)))
    }
}
