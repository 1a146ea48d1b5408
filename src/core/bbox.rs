use crate::core::math;
use crate::core::ray;
use crate::core::vector;

use std::fmt;
use std::fmt::Display;

/// Axis-aligned bounding box. A box built from real geometry always has `min[i] <= max[i]`; the
/// `empty()` box uses infinite sentinels so that combining it with any box yields that box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: vector::Vec3<f64>,
    pub max: vector::Vec3<f64>
}

impl BBox {
    pub fn empty() -> BBox {
        BBox {
            min: vector::Vec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: vector::Vec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY)
        }
    }

    pub fn new(min: vector::Vec3<f64>, max: vector::Vec3<f64>) -> BBox {
        BBox {min: min, max: max}
    }

    /// True for boxes that contain no point at all. Flat boxes (zero extent along an axis) are
    /// not empty.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn union_with(&self, k: &vector::Vec3<f64>) -> BBox {
        BBox {
            min: self.min.comp_min(k),
            max: self.max.comp_max(k)
        }
    }

    pub fn combine_with(&self, b: &BBox) -> BBox {
        BBox {
            min: self.min.comp_min(&b.min),
            max: self.max.comp_max(&b.max)
        }
    }

    pub fn diagonal(&self) -> vector::Vec3<f64> {
        self.max - self.min
    }

    pub fn centroid(&self) -> vector::Vec3<f64> {
        0.5 * self.min + 0.5 * self.max
    }

    /// Surface area of the box. Only meaningful as a split-cost proxy.
    pub fn surface_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    pub fn contains_box(&self, b: &BBox) -> bool {
        self.min.x <= b.min.x && self.min.y <= b.min.y && self.min.z <= b.min.z
                && self.max.x >= b.max.x && self.max.y >= b.max.y && self.max.z >= b.max.z
    }

    /// Conservative slab test: returns true if the ray might pass through the box somewhere in
    /// the parametric range `[0, max_lambda]`.
    ///
    /// The far end is widened by a few ulps so that a triangle hit at exactly `max_lambda` is not
    /// lost to rounding differences between this test and the ray/triangle test.
    pub fn any_intersection(&self, ray: &ray::Ray, max_lambda: f64) -> bool {
        let slack = 1.0 + 2.0 * math::gamma(8);
        let mut t_near = 0.0;
        let mut t_far = max_lambda * slack;

        for i in 0..3 {
            let origin = ray.origin[i];
            let direction = ray.direction[i];
            if direction != 0.0 {
                let mut t1 = (self.min[i] - origin) / direction;
                let mut t2 = (self.max[i] - origin) / direction;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t2 *= slack;
                if t1 > t_near {
                    t_near = t1;
                }
                if t2 < t_far {
                    t_far = t2;
                }
                if t_near > t_far || t_far < 0.0 {
                    return false;
                }
            }
            else if origin < self.min[i] || origin > self.max[i] {
                // Parallel to this slab and outside of it.
                return false;
            }
        }

        true
    }
}

impl Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BBox {{min: {}, max: {}}}", self.min, self.max)
    }
}
