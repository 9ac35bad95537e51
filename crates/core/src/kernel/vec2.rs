use serde::{Deserialize, Serialize};

/// A pair of finite 64-bit reals. Every operation here is defined to stay finite
/// whenever its inputs are finite; `normalize` of the zero vector returns zero
/// rather than NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn normalize(self) -> Vec2 {
        let len_sq = self.length_squared();
        if len_sq == 0.0 {
            Vec2::ZERO
        } else {
            self.scale(1.0 / len_sq.sqrt())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_normalizes_to_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn normalize_is_unit_length() {
        let v = Vec2::new(3.0, 4.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn basic_algebra() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a.add(b), Vec2::new(4.0, 1.0));
        assert_eq!(a.sub(b), Vec2::new(-2.0, 3.0));
        assert_eq!(a.scale(2.0), Vec2::new(2.0, 4.0));
        assert_eq!(a.dot(b), 1.0);
    }

    #[test]
    fn no_nan_on_finite_input() {
        let v = Vec2::new(1e300, 1e300);
        let n = v.normalize();
        assert!(n.x.is_finite() && n.y.is_finite());
    }
}
