//! Ring wedge geometry for slices
//!
//! In polar coordinates a wedge is defined by:
//! - inner_radius / outer_radius: radial extent of the ring
//! - theta_start, theta_end: angular extent, counter-clockwise, span < 2π
//!
//! Angles are kept unnormalized (start in [0, 2π), end = start + span) so a
//! wedge crossing 0° needs no wraparound handling.

use glam::{Vec2, Vec3};

use crate::polar_to_cartesian;

/// An annular wedge in the floor plane
#[derive(Debug, Clone)]
pub struct ArcSegment {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Start angle (radians)
    pub theta_start: f32,
    /// End angle (radians), always greater than `theta_start`
    pub theta_end: f32,
}

impl ArcSegment {
    /// Wedge covering `[start_deg, start_deg + span_deg]`
    pub fn from_degrees(inner_radius: f32, outer_radius: f32, start_deg: f32, span_deg: f32) -> Self {
        Self {
            inner_radius,
            outer_radius,
            theta_start: start_deg.to_radians(),
            theta_end: (start_deg + span_deg).to_radians(),
        }
    }

    /// Angular span of the wedge
    pub fn angular_span(&self) -> f32 {
        self.theta_end - self.theta_start
    }

    /// Check if an angle is within the wedge's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        let tau = std::f32::consts::TAU;
        let offset = (theta - self.theta_start).rem_euclid(tau);
        offset <= self.angular_span()
    }

    /// Check if a floor-plane point (x, z as Vec2) is inside the wedge
    pub fn contains_point(&self, point: Vec2) -> bool {
        let r = point.length();
        let theta = point.y.atan2(point.x);
        r >= self.inner_radius && r <= self.outer_radius && self.contains_angle(theta)
    }

    /// Closed outline: start edge outward, outer arc forward, end edge inward,
    /// inner arc back. `arc_points` samples per arc (clamped to at least 2).
    pub fn outline(&self, arc_points: usize) -> Vec<Vec2> {
        let n = arc_points.max(2);
        let span = self.angular_span();
        let mut points = Vec::with_capacity(n * 2);

        for i in 0..n {
            let t = i as f32 / (n - 1) as f32;
            points.push(polar_to_cartesian(self.outer_radius, self.theta_start + t * span));
        }
        for i in 0..n {
            let t = i as f32 / (n - 1) as f32;
            points.push(polar_to_cartesian(self.inner_radius, self.theta_end - t * span));
        }
        points
    }

    /// Split into `count` flat triangles in the XZ plane, apex at the ring
    /// centre and base on the outer radius.
    pub fn unit_triangles(&self, count: u32) -> Vec<[Vec3; 3]> {
        let step = self.angular_span() / count.max(1) as f32;
        (0..count)
            .map(|i| {
                let a0 = self.theta_start + i as f32 * step;
                let a1 = a0 + step;
                let p0 = polar_to_cartesian(self.outer_radius, a0);
                let p1 = polar_to_cartesian(self.outer_radius, a1);
                [Vec3::ZERO, Vec3::new(p0.x, 0.0, p0.y), Vec3::new(p1.x, 0.0, p1.y)]
            })
            .collect()
    }
}
