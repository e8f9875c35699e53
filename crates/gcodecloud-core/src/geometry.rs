//! Geometry primitives for decoded toolpaths.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::MAX_ROUND_DECIMALS;

/// Absolute 3D position in the units of the source program.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`
    pub fn distance(&self, other: &Point3) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`
    pub fn lerp(&self, other: &Point3, t: f64) -> Point3 {
        Point3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Round every component to `decimals` places
    pub fn rounded(&self, decimals: u32) -> Point3 {
        Point3 {
            x: round_to(self.x, decimals),
            y: round_to(self.y, decimals),
            z: round_to(self.z, decimals),
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

impl std::fmt::Display for Point3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Round `value` to `decimals` places, half away from zero.
///
/// Precision beyond [`MAX_ROUND_DECIMALS`] is clamped.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals.min(MAX_ROUND_DECIMALS) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Axis-aligned bounding box accumulator.
///
/// Starts at the `+inf`/`-inf` sentinel and only becomes valid once a point
/// has been added. Serialized as `null` while unset, since JSON has no
/// infinities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3,
    pub max: Point3,
}

#[derive(Serialize)]
struct ExtentRef<'a> {
    min: &'a Point3,
    max: &'a Point3,
}

#[derive(Deserialize)]
struct Extent {
    min: Point3,
    max: Point3,
}

impl Serialize for Bounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.is_valid()
            .then_some(ExtentRef {
                min: &self.min,
                max: &self.max,
            })
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<Extent>::deserialize(deserializer)? {
            Some(Extent { min, max }) => Bounds { min, max },
            None => Bounds::new(),
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    pub fn new() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn update(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.max.x = self.max.x.max(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.y = self.max.y.max(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.z = self.max.z.max(p.z);
    }

    /// True once at least one point has been accumulated
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            // a single-layer print has min_z == max_z, which is fine
            && self.min.z <= self.max.z
    }

    /// Extent along each axis, or `None` while unset
    pub fn size(&self) -> Option<Point3> {
        self.is_valid().then(|| {
            Point3::new(
                self.max.x - self.min.x,
                self.max.y - self.min.y,
                self.max.z - self.min.z,
            )
        })
    }

    pub fn center(&self) -> Option<Point3> {
        self.is_valid().then(|| self.min.lerp(&self.max, 0.5))
    }

    /// Merge another box into this one; unset boxes are ignored
    pub fn merge(&mut self, other: &Bounds) {
        if other.is_valid() {
            self.update(&other.min);
            self.update(&other.max);
        }
    }
}
