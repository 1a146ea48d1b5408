use num::traits::{Float, Signed};
use std::fmt;
use std::fmt::Display;
use std::ops::{Add, Sub, Mul, Div, Neg, Index, IndexMut};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vec3<T> where T: Signed + Copy {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Vec3<T> where T: Signed + Copy {
    pub fn new(x: T, y: T, z: T) -> Vec3<T> {
        Vec3 {x: x, y: y, z: z}
    }

    pub fn zero() -> Vec3<T> {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    pub fn one() -> Vec3<T> {
        Self::new(T::one(), T::one(), T::one())
    }

    pub fn cross(&self, other: &Vec3<T>) -> Vec3<T> {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x)
    }

    pub fn dot(&self, other: &Vec3<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl<T> Display for Vec3<T> where T: Signed + Copy + Display {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Axis access: 0 is x, 1 is y, 2 is z.
impl<T> Index<usize> for Vec3<T> where T: Signed + Copy {
    type Output = T;
    fn index(&self, axis: usize) -> &T {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 axis out of range: {}", axis)
        }
    }
}

impl<T> IndexMut<usize> for Vec3<T> where T: Signed + Copy {
    fn index_mut(&mut self, axis: usize) -> &mut T {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vec3 axis out of range: {}", axis)
        }
    }
}

impl<T> Add for Vec3<T> where T: Signed + Copy {
    type Output = Vec3<T>;
    fn add(mut self, _rhs: Vec3<T>) -> Vec3<T> {
        self.x = self.x + _rhs.x;
        self.y = self.y + _rhs.y;
        self.z = self.z + _rhs.z;
        self
    }
}

impl<T> Sub for Vec3<T> where T: Signed + Copy {
    type Output = Vec3<T>;
    fn sub(mut self, _rhs: Vec3<T>) -> Vec3<T> {
        self.x = self.x - _rhs.x;
        self.y = self.y - _rhs.y;
        self.z = self.z - _rhs.z;
        self
    }
}

impl<T> Mul<T> for Vec3<T> where T: Signed + Copy {
    type Output = Vec3<T>;
    fn mul(mut self, _rhs: T) -> Vec3<T> {
        self.x = self.x * _rhs;
        self.y = self.y * _rhs;
        self.z = self.z * _rhs;
        self
    }
}

impl Mul<Vec3<f64>> for f64 {
    type Output = Vec3<f64>;
    fn mul(self, _rhs: Vec3<f64>) -> Vec3<f64> { _rhs * self }
}

impl Mul<Vec3<i32>> for i32 {
    type Output = Vec3<i32>;
    fn mul(self, _rhs: Vec3<i32>) -> Vec3<i32> { _rhs * self }
}

impl<T> Div<T> for Vec3<T> where T: Signed + Copy {
    type Output = Vec3<T>;
    fn div(mut self, _rhs: T) -> Vec3<T> {
        self.x = self.x / _rhs;
        self.y = self.y / _rhs;
        self.z = self.z / _rhs;
        self
    }
}

impl<T> Neg for Vec3<T> where T: Signed + Copy {
    type Output = Vec3<T>;
    fn neg(mut self) -> Vec3<T> {
        self.x = -self.x;
        self.y = -self.y;
        self.z = -self.z;
        self
    }
}

impl<T> Vec3<T> where T: Float + Signed + Copy {
    pub fn magnitude(&self) -> T {
        T::sqrt(self.dot(self))
    }

    pub fn normalized(&self) -> Vec3<T> {
        let length = self.magnitude();
        Self::new(self.x / length, self.y / length, self.z / length)
    }

    /**
     * Component-wise minimum. Used to grow the min corner of a bounding box.
     */
    pub fn comp_min(&self, other: &Vec3<T>) -> Vec3<T> {
        Self::new(T::min(self.x, other.x), T::min(self.y, other.y), T::min(self.z, other.z))
    }

    /**
     * Component-wise maximum. Used to grow the max corner of a bounding box.
     */
    pub fn comp_max(&self, other: &Vec3<T>) -> Vec3<T> {
        Self::new(T::max(self.x, other.x), T::max(self.y, other.y), T::max(self.z, other.z))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}
