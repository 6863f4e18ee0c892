//! Pure type declarations for tile geometry. These carry no logic; tile assembly and
//! geometry encoding live with the tile container, not in the attribute codec. Points
//! on lines and polygons may carry an M-value, which is an ordinary attribute
//! document.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A bounding box in lon-lat space: `[left, bottom, right, top]`.
pub type BBox = [f64; 4];

/// A bounding box in lon-lat space with a depth range:
/// `[left, bottom, right, top, near, far]`.
pub type BBox3D = [f64; 6];

/// A 2D point, optionally carrying an M-value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<Value>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, m: None }
    }
}

/// A 3D point, optionally carrying an M-value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<Value>,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, m: None }
    }
}

pub type VectorPoints = Vec<Point>;
pub type VectorPoints3D = Vec<Point3D>;
pub type VectorLine = Vec<Point>;
pub type VectorLine3D = Vec<Point3D>;
pub type VectorLines = Vec<VectorLine>;
pub type VectorLines3D = Vec<VectorLine3D>;
pub type VectorPoly = Vec<Vec<Point>>;
pub type VectorPoly3D = Vec<Vec<Point3D>>;
pub type VectorMultiPoly = Vec<VectorPoly>;
pub type VectorMultiPoly3D = Vec<VectorPoly3D>;

/// Open Vector Tile feature types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    Points = 1,
    Lines = 2,
    Polygons = 3,
    Points3D = 4,
    Lines3D = 5,
    Polygons3D = 6,
}

impl FeatureType {
    pub fn from_u64(v: u64) -> Option<FeatureType> {
        match v {
            1 => Some(FeatureType::Points),
            2 => Some(FeatureType::Lines),
            3 => Some(FeatureType::Polygons),
            4 => Some(FeatureType::Points3D),
            5 => Some(FeatureType::Lines3D),
            6 => Some(FeatureType::Polygons3D),
            _ => None,
        }
    }
}

/// Any geometry a feature can carry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VectorGeometry {
    Points(VectorPoints),
    Lines(VectorLines),
    Polygons(VectorMultiPoly),
    Points3D(VectorPoints3D),
    Lines3D(VectorLines3D),
    Polygons3D(VectorMultiPoly3D),
}

impl VectorGeometry {
    pub fn feature_type(&self) -> FeatureType {
        match self {
            VectorGeometry::Points(_) => FeatureType::Points,
            VectorGeometry::Lines(_) => FeatureType::Lines,
            VectorGeometry::Polygons(_) => FeatureType::Polygons,
            VectorGeometry::Points3D(_) => FeatureType::Points3D,
            VectorGeometry::Lines3D(_) => FeatureType::Lines3D,
            VectorGeometry::Polygons3D(_) => FeatureType::Polygons3D,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_type_round_trip() {
        for v in 1..=6u64 {
            let ft = FeatureType::from_u64(v).unwrap();
            assert_eq!(ft as u64, v);
        }
        assert_eq!(FeatureType::from_u64(0), None);
        assert_eq!(FeatureType::from_u64(7), None);
    }

    #[test]
    fn geometry_reports_its_type() {
        let geom = VectorGeometry::Lines(vec![vec![Point::new(0.0, 0.0), Point::new(1.0, 2.0)]]);
        assert_eq!(geom.feature_type(), FeatureType::Lines);
    }
}
