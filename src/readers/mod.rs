pub mod gdal_source;
pub mod geotiff;
pub mod memory;
pub mod transform;
pub mod types;
pub mod utils;

pub use gdal_source::GdalSource;
pub use geotiff::GeoTiffSource;
pub use memory::MemorySource;
pub use transform::GeoTransform;
pub use types::{Grid, PixelWindow, RasterSource, ReadError};
pub use utils::{Backend, FileType, reader_from_filetype};

use std::path::Path;

pub fn create_source(
    path: impl AsRef<Path>,
    backend: Backend,
) -> Result<Box<dyn RasterSource>, ReadError> {
    let path = path.as_ref();
    match (reader_from_filetype(path)?, backend) {
        (FileType::GeoTiff, Backend::Tiff) => Ok(Box::new(GeoTiffSource::open(path)?)),
        (FileType::GeoTiff, Backend::Gdal) => Ok(Box::new(GdalSource::open(path)?)),
    }
}
