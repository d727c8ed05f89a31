//! Dynamic obstacles: a rigid point cloud moving with constant velocity.

use rwca_core::{ObstacleId, Vec3};

/// Corners of an axis-aligned cube of side 1 centred on the origin.
pub const UNIT_CUBE: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(-0.5, -0.5,  0.5),
    Vec3::new(-0.5,  0.5, -0.5),
    Vec3::new(-0.5,  0.5,  0.5),
    Vec3::new( 0.5, -0.5, -0.5),
    Vec3::new( 0.5, -0.5,  0.5),
    Vec3::new( 0.5,  0.5, -0.5),
    Vec3::new( 0.5,  0.5,  0.5),
];

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub id: ObstacleId,
    pub position: Vec3,
    /// Shape points in the obstacle's local frame (relative to `position`).
    pub shape: Vec<Vec3>,
    pub velocity: Vec3,
}

impl Obstacle {
    pub fn new(id: ObstacleId, position: Vec3, shape: Vec<Vec3>, velocity: Vec3) -> Self {
        Self { id, position, shape, velocity }
    }

    /// A shapeless, motionless obstacle at the origin.
    pub fn empty(id: ObstacleId) -> Self {
        Self::new(id, Vec3::ZERO, Vec::new(), Vec3::ZERO)
    }

    /// A unit cube centred on `position`.
    pub fn unit_cube(id: ObstacleId, position: Vec3, velocity: Vec3) -> Self {
        Self::new(id, position, UNIT_CUBE.to_vec(), velocity)
    }

    /// Shape points translated into the world frame.
    pub fn world_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.shape.iter().map(move |&p| self.position + p)
    }

    /// Largest distance from `position` to any shape point.
    pub fn bounding_radius(&self) -> f64 {
        self.shape.iter().map(|p| p.length()).fold(0.0, f64::max)
    }
}
