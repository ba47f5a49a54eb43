//! Geometric value types carried by mesh vertices.

use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A position in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point(DVec3);

/// A direction (or displacement) in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector(DVec3);

impl Point {
    pub const ORIGIN: Self = Self(DVec3::ZERO);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        self.0.distance(other.0)
    }

    pub fn to_array(&self) -> [f64; 3] {
        self.0.to_array()
    }
}

impl Vector {
    pub const ZERO: Self = Self(DVec3::ZERO);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Euclidean length
    pub fn norm(&self) -> f64 {
        self.0.length()
    }

    pub fn dot(&self, other: Vector) -> f64 {
        self.0.dot(other.0)
    }

    pub fn cross(&self, other: Vector) -> Vector {
        Self(self.0.cross(other.0))
    }

    /// Unit vector in the same direction, or zero for a zero vector
    pub fn normalized(&self) -> Vector {
        Self(self.0.normalize_or_zero())
    }

    pub fn to_array(&self) -> [f64; 3] {
        self.0.to_array()
    }
}

impl From<[f64; 3]> for Point {
    fn from(value: [f64; 3]) -> Self {
        Self(DVec3::from_array(value))
    }
}

impl From<[f64; 3]> for Vector {
    fn from(value: [f64; 3]) -> Self {
        Self(DVec3::from_array(value))
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector(self.0 - rhs.0)
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;

    fn sub(self, rhs: Vector) -> Point {
        Point(self.0 - rhs.0)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector(self.0 + rhs.0)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector(self.0 - rhs.0)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        Vector(self.0 * rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector(-self.0)
    }
}
