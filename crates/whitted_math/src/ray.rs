use crate::Vector3;

/// A ray in 3D space with an origin and a direction.
///
/// Represents the half-line `origin + t * direction`. The direction is not
/// normalized by the constructor; tracing code normalizes where it needs to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vector3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + direction * t
    #[inline]
    pub fn at(&self, t: f32) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Ray starting at `origin + offset` with the same direction.
    ///
    /// Secondary rays are pushed off the surface along the normal by a small
    /// bias so they do not re-hit the surface they leave.
    #[inline]
    pub fn offset(&self, offset: Vector3) -> Self {
        Self::new(self.origin + offset, self.direction)
    }
}
