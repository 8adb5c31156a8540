//! Periodic box geometry under simple shear (Lees-Edwards boundary conditions).
//!
//! Crossing the top or bottom edge of the box shifts x by `height * shear` and the
//! x-velocity by `height * shear_rate`, which represents the moving images above and below
//! the primary cell. The frame is a small `Copy` value handed to every geometry call.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    config::{DEFAULT_BOX_HEIGHT, DEFAULT_BOX_WIDTH},
    core::point::Point,
    error::{Result, ShearError},
    utils::math::{fold_periodic, unit_from_angle},
};

/// How the box edges couple to the particles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryModel {
    /// Euclidean geometry; positions wrap on both axes without any shear coupling.
    Plain,
    /// Sheared periodic images.
    #[default]
    LeesEdwards,
}

/// Number of box periods removed on each axis by [`Frame::wrap_to_box`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCount {
    pub x: i64,
    pub y: i64,
}

impl ImageCount {
    pub fn is_primary(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Result of wrapping a point into the primary cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wrapped {
    pub position: DVec2,
    pub velocity: DVec2,
    pub images: ImageCount,
}

/// Minimum-image separation between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortestImage {
    pub delta: DVec2,
    pub images: ImageCount,
}

impl ShortestImage {
    /// Whether a periodic shift was needed to reach the nearest image.
    pub fn crosses_boundary(&self) -> bool {
        !self.images.is_primary()
    }
}

/// Geometry of one contact seen from its target particle.
///
/// `normal` points from the target toward the source and `tangent` is the normal rotated by
/// a quarter turn counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairGeometry {
    /// Shortest-image vector from target to source.
    pub delta: DVec2,
    pub distance: f64,
    pub normal: DVec2,
    pub tangent: DVec2,
    /// Source velocity minus target velocity, corrected for the image shift.
    pub relative_velocity: DVec2,
    pub crosses_boundary: bool,
    /// The centres coincided and the normal was drawn at random.
    pub degenerate: bool,
}

impl PairGeometry {
    /// Branch vector from the source to the target.
    pub fn branch(&self) -> DVec2 {
        -self.delta
    }

    /// Same contact seen from the source particle.
    pub fn reversed(&self) -> Self {
        Self {
            delta: -self.delta,
            distance: self.distance,
            normal: -self.normal,
            tangent: -self.tangent,
            relative_velocity: -self.relative_velocity,
            crosses_boundary: self.crosses_boundary,
            degenerate: self.degenerate,
        }
    }

    /// Velocity along the normal; negative while the pair approaches.
    pub fn normal_speed(&self) -> f64 {
        self.relative_velocity.dot(self.normal)
    }
}

/// Box size and shear state shared by all geometry calls of one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub size: DVec2,
    /// Accumulated strain; x offset of the image above is `height * shear`.
    pub shear: f64,
    /// Strain rate in 1/s.
    pub shear_rate: f64,
    pub boundary: BoundaryModel,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            size: DVec2::new(DEFAULT_BOX_WIDTH, DEFAULT_BOX_HEIGHT),
            shear: 0.0,
            shear_rate: 0.0,
            boundary: BoundaryModel::default(),
        }
    }
}

impl Frame {
    pub fn new(width: f64, height: f64, boundary: BoundaryModel) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height)) {
            return Err(ShearError::InvalidBoxSize(width, height));
        }
        Ok(Self {
            size: DVec2::new(width, height),
            shear: 0.0,
            shear_rate: 0.0,
            boundary,
        })
    }

    pub fn lees_edwards(width: f64, height: f64) -> Result<Self> {
        Self::new(width, height, BoundaryModel::LeesEdwards)
    }

    pub fn plain(width: f64, height: f64) -> Result<Self> {
        Self::new(width, height, BoundaryModel::Plain)
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }

    pub fn area(&self) -> f64 {
        self.size.x * self.size.y
    }

    pub fn center(&self) -> DVec2 {
        self.size * 0.5
    }

    pub fn is_lees_edwards(&self) -> bool {
        self.boundary == BoundaryModel::LeesEdwards
    }

    /// x-velocity of the affine shear flow at height `y`.
    pub fn local_flow_velocity(&self, y: f64) -> f64 {
        (y - 0.5 * self.size.y) * self.shear_rate
    }

    pub fn advance_shear(&mut self, dt: f64) {
        self.shear += self.shear_rate * dt;
    }

    /// Brings a point back into `[0, width) x [0, height)`.
    pub fn wrap_to_box(&self, position: DVec2, velocity: DVec2) -> Wrapped {
        match self.boundary {
            BoundaryModel::Plain => {
                let (x, nx) = fold_periodic(position.x, self.size.x, 0.0);
                let (y, ny) = fold_periodic(position.y, self.size.y, 0.0);
                Wrapped {
                    position: DVec2::new(x, y),
                    velocity,
                    images: ImageCount { x: nx, y: ny },
                }
            }
            BoundaryModel::LeesEdwards => {
                let (y, ny) = fold_periodic(position.y, self.size.y, 0.0);
                let sheared_x = position.x - ny as f64 * self.size.y * self.shear;
                let (x, nx) = fold_periodic(sheared_x, self.size.x, 0.0);
                let mut velocity = velocity;
                velocity.x += (y - position.y) * self.shear_rate;
                Wrapped {
                    position: DVec2::new(x, y),
                    velocity,
                    images: ImageCount { x: nx, y: ny },
                }
            }
        }
    }

    /// Inverse of [`Frame::wrap_to_box`] for the same shear.
    pub fn unwrap(&self, position: DVec2, images: ImageCount) -> DVec2 {
        let mut x = position.x + images.x as f64 * self.size.x;
        if self.is_lees_edwards() {
            x += images.y as f64 * self.size.y * self.shear;
        }
        DVec2::new(x, position.y + images.y as f64 * self.size.y)
    }

    /// Nearest periodic image of `delta`, with each component in `[-size/2, size/2)`.
    pub fn shortest_image(&self, delta: DVec2) -> ShortestImage {
        match self.boundary {
            BoundaryModel::Plain => ShortestImage {
                delta,
                images: ImageCount::default(),
            },
            BoundaryModel::LeesEdwards => {
                let half = self.center();
                let (dy, ny) = fold_periodic(delta.y, self.size.y, -half.y);
                let sheared_dx = delta.x - ny as f64 * self.size.y * self.shear;
                let (dx, nx) = fold_periodic(sheared_dx, self.size.x, -half.x);
                ShortestImage {
                    delta: DVec2::new(dx, dy),
                    images: ImageCount { x: nx, y: ny },
                }
            }
        }
    }

    /// Shortest-image distance between two positions.
    pub fn distance(&self, a: DVec2, b: DVec2) -> f64 {
        self.shortest_image(b - a).delta.length()
    }

    /// Velocity of `source` relative to `target`, seen through the nearest vertical image.
    pub fn relative_velocity(&self, target: &Point, source: &Point) -> DVec2 {
        let mut relative = source.velocity - target.velocity;
        if self.is_lees_edwards() {
            let dy = source.position.y - target.position.y;
            let (_, ny) = fold_periodic(dy, self.size.y, -0.5 * self.size.y);
            relative.x -= ny as f64 * self.size.y * self.shear_rate;
        }
        relative
    }

    /// Full contact geometry from `target` toward `source`.
    ///
    /// Coincident centres get a uniformly random normal drawn from `rng`.
    pub fn pair_geometry<R: Rng>(
        &self,
        target: &Point,
        source: &Point,
        rng: &mut R,
    ) -> PairGeometry {
        let image = self.shortest_image(source.position - target.position);
        let distance = image.delta.length();
        let degenerate = distance <= 0.0;
        let normal = if degenerate {
            unit_from_angle(rng.gen_range(0.0..TAU))
        } else {
            image.delta / distance
        };
        PairGeometry {
            delta: image.delta,
            distance,
            normal,
            tangent: normal.perp(),
            relative_velocity: self.relative_velocity(target, source),
            crosses_boundary: image.crosses_boundary(),
            degenerate,
        }
    }
}
