use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BboxError {
    #[error("Longitude values must be between -180 and 180")]
    Longitude,
    #[error("Latitude values must be between -90 and 90")]
    Latitude,
    #[error("Min values must be <= max values")]
    Order,
    #[error("Expected 4 comma-separated values 'ulx,uly,lrx,lry', got {0:?}")]
    Format(String),
    #[error("Invalid coordinate {0:?}")]
    Number(String),
}

/// Geographic rectangle in decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bbox {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self, BboxError> {
        if !(-180.0..=180.0).contains(&xmin) || !(-180.0..=180.0).contains(&xmax) {
            return Err(BboxError::Longitude);
        }

        if !(-90.0..=90.0).contains(&ymin) || !(-90.0..=90.0).contains(&ymax) {
            return Err(BboxError::Latitude);
        }

        if xmin > xmax || ymin > ymax {
            return Err(BboxError::Order);
        }

        Ok(Bbox {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Build from the (lon, lat) of the upper-left and lower-right corners.
    pub fn from_corners(upper_left: (f64, f64), lower_right: (f64, f64)) -> Result<Self, BboxError> {
        let (ulx, uly) = upper_left;
        let (lrx, lry) = lower_right;
        Self::new(ulx, lrx, lry, uly)
    }

    pub fn upper_left(&self) -> (f64, f64) {
        (self.xmin, self.ymax)
    }

    pub fn lower_right(&self) -> (f64, f64) {
        (self.xmax, self.ymin)
    }

    /// True when the two boxes share a region of non-zero area.
    pub fn intersects(&self, other: &Bbox) -> bool {
        self.xmin < other.xmax
            && self.xmax > other.xmin
            && self.ymin < other.ymax
            && self.ymax > other.ymin
    }
}

impl fmt::Display for Bbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lon [{}, {}] lat [{}, {}]",
            self.xmin, self.xmax, self.ymin, self.ymax
        )
    }
}

/// Parses `ulx,uly,lrx,lry`, the corner order used on the command line.
impl FromStr for Bbox {
    type Err = BboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxError::Format(s.to_string()));
        }

        let mut values = [0.0; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| BboxError::Number(part.to_string()))?;
        }

        Bbox::from_corners((values[0], values[1]), (values[2], values[3]))
    }
}

#[cfg(test)]
mod test {
    use crate::bbox::{Bbox, BboxError};

    #[test]
    fn test_bbox_coords_are_within_ranges() {
        // Test valid coordinates
        let valid_bbox = Bbox::new(-113.0, -109.0, 31.0, 37.0);
        assert!(valid_bbox.is_ok());

        // Test longitude out of range
        let invalid_lon = Bbox::new(-200.0, 0.0, 0.0, 10.0);
        assert_eq!(invalid_lon, Err(BboxError::Longitude));

        let invalid_lon2 = Bbox::new(0.0, 200.0, 0.0, 10.0);
        assert!(invalid_lon2.is_err());

        // Test latitude out of range
        let invalid_lat = Bbox::new(0.0, 10.0, -100.0, 0.0);
        assert_eq!(invalid_lat, Err(BboxError::Latitude));

        let invalid_lat2 = Bbox::new(0.0, 10.0, 0.0, 100.0);
        assert!(invalid_lat2.is_err());

        // Test min > max
        let invalid_order_lon = Bbox::new(10.0, 0.0, 0.0, 10.0);
        assert_eq!(invalid_order_lon, Err(BboxError::Order));

        let invalid_order_lat = Bbox::new(0.0, 10.0, 10.0, 0.0);
        assert!(invalid_order_lat.is_err());
    }

    #[test]
    fn test_from_corners() {
        let bbox = Bbox::from_corners((-113.0, 37.0), (-109.0, 31.0)).unwrap();

        assert_eq!(bbox, Bbox::new(-113.0, -109.0, 31.0, 37.0).unwrap());
        assert_eq!(bbox.upper_left(), (-113.0, 37.0));
        assert_eq!(bbox.lower_right(), (-109.0, 31.0));

        // Corners given the wrong way round
        assert!(Bbox::from_corners((-109.0, 31.0), (-113.0, 37.0)).is_err());
    }

    #[test]
    fn test_parse_from_cli_string() {
        let bbox: Bbox = "-113, 37, -109, 31".parse().unwrap();
        assert_eq!(bbox, Bbox::new(-113.0, -109.0, 31.0, 37.0).unwrap());

        assert!(matches!("1,2,3".parse::<Bbox>(), Err(BboxError::Format(_))));
        assert!(matches!(
            "a,2,3,1".parse::<Bbox>(),
            Err(BboxError::Number(_))
        ));
    }

    #[test]
    fn test_intersects() {
        let extent = Bbox::new(-113.0, -109.0, 31.0, 37.0).unwrap();

        assert!(extent.intersects(&Bbox::new(-112.0, -100.0, 30.0, 32.0).unwrap()));
        assert!(!extent.intersects(&Bbox::new(0.0, 1.0, 0.0, 1.0).unwrap()));
        // Touching edges only
        assert!(!extent.intersects(&Bbox::new(-109.0, -100.0, 31.0, 37.0).unwrap()));
    }
}
