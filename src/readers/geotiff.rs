use ndarray::s;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;

use super::transform::GeoTransform;
use super::{Grid, PixelWindow, RasterSource, ReadError};

/// Single-band GeoTIFF decoded with the pure-Rust `tiff` crate.
///
/// The header and georeferencing tags are read on open; pixel data is decoded on demand.
#[derive(Debug)]
pub struct GeoTiffSource {
    path: PathBuf,
    width: u32,
    height: u32,
    transform: GeoTransform,
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, ReadError> {
    let file = File::open(path)
        .map_err(|e| ReadError::Unreadable(format!("Failed to open file: {}", e)))?;

    let reader = BufReader::new(file);

    // Global 1 km mosaics exceed the decoder's default buffer limits.
    Decoder::new(reader)
        .map(|decoder| decoder.with_limits(Limits::unlimited()))
        .map_err(|e| ReadError::Unreadable(format!("Failed to decode TIFF: {}", e)))
}

fn read_geo_transform(decoder: &mut Decoder<BufReader<File>>) -> Result<GeoTransform, ReadError> {
    let mut f64_tag = |tag: Tag| -> Result<Option<Vec<f64>>, ReadError> {
        decoder
            .find_tag(tag)
            .and_then(|value| value.map(|v| v.into_f64_vec()).transpose())
            .map_err(|e| ReadError::Georeference(format!("Failed to read {:?}: {}", tag, e)))
    };

    if let Some(matrix) = f64_tag(Tag::ModelTransformationTag)? {
        return GeoTransform::from_model_transformation(&matrix);
    }

    match (f64_tag(Tag::ModelTiepointTag)?, f64_tag(Tag::ModelPixelScaleTag)?) {
        (Some(tiepoint), Some(scale)) => GeoTransform::from_tiepoint(&tiepoint, &scale),
        _ => Err(ReadError::Georeference(
            "missing ModelTiepoint/ModelPixelScale tags".to_string(),
        )),
    }
}

impl GeoTiffSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let path = path.as_ref();
        let mut decoder = open_decoder(path)?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| ReadError::Unreadable(format!("Failed to get dimensions: {}", e)))?;

        let transform = read_geo_transform(&mut decoder)?;
        log::debug!(
            "Opened {} ({}x{}) with geotransform {:?}",
            path.display(),
            width,
            height,
            transform
        );

        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
            transform,
        })
    }
}

impl RasterSource for GeoTiffSource {
    fn shape(&self) -> (usize, usize) {
        (self.height as usize, self.width as usize)
    }

    fn geo_transform(&self) -> &GeoTransform {
        &self.transform
    }

    fn read_full(&self) -> Result<Grid, ReadError> {
        let mut decoder = open_decoder(&self.path)?;

        let image_data: Vec<f64> = match decoder
            .read_image()
            .map_err(|e| ReadError::Unreadable(format!("Failed to read image: {}", e)))?
        {
            DecodingResult::U8(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::U16(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::U32(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::U64(data) => data.into_iter().map(|x| x as f64).collect(),
            DecodingResult::I8(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::I16(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::I32(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::I64(data) => data.into_iter().map(|x| x as f64).collect(),
            DecodingResult::F32(data) => data.into_iter().map(f64::from).collect(),
            DecodingResult::F64(data) => data,
            #[allow(unreachable_patterns)]
            _ => return Err(ReadError::Unreadable("Unsupported pixel format".to_string())),
        };

        let shape = self.shape();
        if image_data.len() != shape.0 * shape.1 {
            return Err(ReadError::Unreadable(format!(
                "expected a single-band {}x{} raster, decoded {} samples",
                shape.0,
                shape.1,
                image_data.len()
            )));
        }

        Grid::from_shape_vec(shape, image_data)
            .map_err(|e| ReadError::Unreadable(format!("Failed to reshape raster: {}", e)))
    }

    fn read_pixels(&self, window: &PixelWindow) -> Result<Grid, ReadError> {
        if !window.fits(self.shape()) {
            return Err(ReadError::Unreadable(format!(
                "window {} exceeds raster shape {:?}",
                window,
                self.shape()
            )));
        }

        let full = self.read_full()?;
        Ok(full
            .slice(s![window.row_off..window.row_end(), window.col_off..window.col_end()])
            .to_owned())
    }
}
