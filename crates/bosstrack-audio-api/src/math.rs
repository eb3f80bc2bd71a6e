/// World-space position in distance units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned bounding box, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Cube of half-width `half` centred on `center`.
    #[inline]
    pub fn cube(center: Vec3, half: f64) -> Self {
        Self {
            min: Vec3::new(center.x - half, center.y - half, center.z - half),
            max: Vec3::new(center.x + half, center.y + half, center.z + half),
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_bounds_are_inclusive() {
        let b = Aabb::cube(Vec3::new(10.0, 64.0, -5.0), 20.0);
        assert!(b.contains(Vec3::new(30.0, 64.0, -5.0)));
        assert!(b.contains(Vec3::new(-10.0, 44.0, 15.0)));
        assert!(!b.contains(Vec3::new(30.5, 64.0, -5.0)));
        // Corners count: the region is a cube, not a sphere.
        assert!(b.contains(Vec3::new(29.0, 83.0, 14.0)));
    }
}
