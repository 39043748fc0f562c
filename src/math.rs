use bevy::math::Vec2;

pub type Real = f32;

pub type Vector = Vec2;
pub type Point = Vec2;

/// Exact zero check inverse (prevents NaN from division by zero)
#[inline(always)]
pub fn inv_exact(e: Real) -> Real {
    if e == 0.0 { 0.0 } else { 1.0 / e }
}

/// Clamp a point into `[0, max.x] x [0, max.y]`, one axis at a time.
#[inline]
pub fn clamp_point(point: Point, max: Vector) -> Point {
    Vec2::new(point.x.clamp(0.0, max.x), point.y.clamp(0.0, max.y))
}

#[inline(always)]
pub fn lerp(a: Real, b: Real, t: Real) -> Real {
    a + (b - a) * t
}
