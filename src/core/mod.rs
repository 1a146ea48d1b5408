mod bbox;
pub use crate::core::bbox::BBox;

mod math;
pub use crate::core::math::*;

mod ray;
pub use crate::core::ray::Ray;

mod vector;
pub use crate::core::vector::Vec3;
pub type Vec3f = vector::Vec3<f64>;
pub type Vec3i = vector::Vec3<i32>;
