//! Planar coordinate type and region bounds.
//!
//! The simulated region is a rectangle anchored at the origin,
//! `[0, width] × [0, height]`, in abstract length units.  `Vec2` uses `f64`
//! throughout: positions are integrated over thousands of ticks and the
//! contamination grid is addressed by `floor(pos / cell_size)`, so single
//! precision drift would move agents between cells.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 2-D point or displacement.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length_sq(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn distance_sq(self, other: Vec2) -> f64 {
        (self - other).length_sq()
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a (near-)zero vector.
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len > f64::EPSILON {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    /// Scale the vector down so its length does not exceed `max`.
    pub fn clamp_length(self, max: f64) -> Vec2 {
        let len = self.length();
        if len > max && len > 0.0 {
            self * (max / len)
        } else {
            self
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// The rectangular extent of the simulated region, anchored at the origin.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub width:  f64,
    pub height: f64,
}

impl Bounds {
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `true` if `p` lies inside the closed rectangle.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Nearest point inside the rectangle.
    #[inline]
    pub fn clamp(self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }

    /// Reflect a position that overshot an edge back into the region,
    /// flipping the matching velocity component.
    ///
    /// A single reflection is applied per axis; anything still outside after
    /// that (a step longer than the region itself) is clamped.
    pub fn reflect(self, pos: Vec2, vel: Vec2) -> (Vec2, Vec2) {
        let (x, vx) = reflect_axis(pos.x, vel.x, self.width);
        let (y, vy) = reflect_axis(pos.y, vel.y, self.height);
        (self.clamp(Vec2::new(x, y)), Vec2::new(vx, vy))
    }
}

fn reflect_axis(p: f64, v: f64, max: f64) -> (f64, f64) {
    if p < 0.0 {
        (-p, -v)
    } else if p > max {
        (2.0 * max - p, -v)
    } else {
        (p, v)
    }
}
