use crate::core::vector;
use std::fmt;
use std::fmt::Display;

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: vector::Vec3<f64>,
    pub direction: vector::Vec3<f64>,
}

impl Ray {
    /// Creates a ray; the direction is normalized so that parametric distances along the ray are
    /// world-space distances.
    pub fn new(origin: vector::Vec3<f64>, direction: vector::Vec3<f64>) -> Ray {
        Ray {origin: origin, direction: direction.normalized()}
    }

    pub fn at(&self, k: f64) -> vector::Vec3<f64> {
        self.origin + k * self.direction
    }
}

impl Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ray {{origin: {}, direction: {}}}", self.origin, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec3f;

    #[test]
    fn direction_is_normalized() {
        let ray = Ray::new(Vec3f::zero(), Vec3f::new(0.0, 0.0, 10.0));
        assert_eq!(ray.direction, Vec3f::new(0.0, 0.0, 1.0));
        assert_eq!(ray.at(2.5), Vec3f::new(0.0, 0.0, 2.5));
    }
}
