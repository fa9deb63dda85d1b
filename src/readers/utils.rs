use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::types::ReadError;

pub enum FileType {
    GeoTiff,
}

/// Library used to decode rasters.
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// Pure-Rust TIFF decoder.
    #[default]
    #[serde(rename = "tiff")]
    Tiff,
    /// GDAL, with true windowed reads.
    #[serde(rename = "gdal")]
    Gdal,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Tiff => write!(f, "tiff"),
            Backend::Gdal => write!(f, "gdal"),
        }
    }
}

pub fn reader_from_filetype(path: &Path) -> Result<FileType, ReadError> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("tif") | Some("tiff") => Ok(FileType::GeoTiff),
        _ => Err(ReadError::UnknownFileType(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_from_filetype() {
        assert!(matches!(
            reader_from_filetype(Path::new("GEDI04_B_035_02_002_003_01km_MU.tif")),
            Ok(FileType::GeoTiff)
        ));
        assert!(matches!(
            reader_from_filetype(Path::new("/data/mosaic.TIFF")),
            Ok(FileType::GeoTiff)
        ));
        assert!(matches!(
            reader_from_filetype(Path::new("GEDI04_B_035_02_002_003_01km_MU.nc")),
            Err(ReadError::UnknownFileType(_))
        ));
        assert!(reader_from_filetype(Path::new("no_extension")).is_err());
    }
}
