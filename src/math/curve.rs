use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Arc-length lookup resolution
const ARC_DIVISIONS: usize = 400;

/// Spline flavour used between control points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveKind {
    /// Uniform Catmull-Rom with tangents scaled by `tension`
    CatmullRom { tension: f32 },
    /// Centripetal parameterisation (alpha = 0.5), avoids cusps on uneven spacing
    Centripetal,
}

impl Default for CurveKind {
    fn default() -> Self {
        CurveKind::CatmullRom { tension: 0.3 }
    }
}

/// Closed Catmull-Rom curve through an ordered loop of control points.
///
/// `point(t)` walks the raw spline parameter, `point_at(u)` walks arc length so
/// equal steps in `u` cover equal distances. Both wrap modulo 1.
#[derive(Debug, Clone)]
pub struct TrackCurve {
    points: Vec<Vec3>,
    kind: CurveKind,
    arc_lengths: Vec<f32>,
}

impl TrackCurve {
    /// Returns `None` when fewer than two control points are given
    pub fn new(points: Vec<Vec3>, kind: CurveKind) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let mut curve = Self {
            points,
            kind,
            arc_lengths: Vec::with_capacity(ARC_DIVISIONS + 1),
        };
        curve.arc_lengths = curve.compute_arc_lengths();
        Some(curve)
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Total loop length in world units
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at raw spline parameter `t` (wraps)
    pub fn point(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        let p = n as f32 * t.rem_euclid(1.0);
        let segment = p.floor();
        let weight = p - segment;
        let i = segment as usize % n;

        let p0 = self.points[(i + n - 1) % n];
        let p1 = self.points[i];
        let p2 = self.points[(i + 1) % n];
        let p3 = self.points[(i + 2) % n];

        let (m0, m1) = match self.kind {
            CurveKind::CatmullRom { tension } => ((p2 - p0) * tension, (p3 - p1) * tension),
            CurveKind::Centripetal => centripetal_tangents(p0, p1, p2, p3),
        };

        hermite(p1, m0, p2, m1, weight)
    }

    /// Point at arc-length fraction `u` (wraps)
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.arc_to_param(u))
    }

    /// Unit direction from `u` toward `u + epsilon`
    pub fn heading_at(&self, u: f32, epsilon: f32) -> Vec3 {
        let here = self.point_at(u);
        let ahead = self.point_at(u + epsilon);
        (ahead - here).normalize_or(Vec3::Z)
    }

    /// `count` evenly spaced (by arc length) points, first at `u = 0`
    pub fn spaced_points(&self, count: usize) -> Vec<Vec3> {
        (0..count)
            .map(|i| self.point_at(i as f32 / count as f32))
            .collect()
    }

    /// Map arc-length fraction to spline parameter
    fn arc_to_param(&self, u: f32) -> f32 {
        let u = u.rem_euclid(1.0);
        let total = self.length();
        if total <= f32::EPSILON {
            return u;
        }

        let target = u * total;
        let lens = &self.arc_lengths;

        // Largest i with lens[i] <= target
        let i = match lens.binary_search_by(|l| l.total_cmp(&target)) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
        .min(ARC_DIVISIONS - 1);

        let seg = lens[i + 1] - lens[i];
        let frac = if seg > 0.0 { (target - lens[i]) / seg } else { 0.0 };
        (i as f32 + frac) / ARC_DIVISIONS as f32
    }

    fn compute_arc_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_DIVISIONS + 1);
        let mut total = 0.0;
        let mut last = self.point(0.0);
        lengths.push(0.0);

        for i in 1..=ARC_DIVISIONS {
            let p = self.point(i as f32 / ARC_DIVISIONS as f32);
            total += p.distance(last);
            lengths.push(total);
            last = p;
        }

        lengths
    }
}

/// Cubic Hermite segment from `p1` to `p2` with end tangents `m0`, `m1`
fn hermite(p1: Vec3, m0: Vec3, p2: Vec3, m1: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    p1 * h00 + m0 * h10 + p2 * h01 + m1 * h11
}

/// Tangents of the non-uniform (centripetal) segment, rescaled to `[0, 1]`
fn centripetal_tangents(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> (Vec3, Vec3) {
    let mut dt0 = p0.distance_squared(p1).powf(0.25);
    let mut dt1 = p1.distance_squared(p2).powf(0.25);
    let mut dt2 = p2.distance_squared(p3).powf(0.25);

    // Coincident points
    if dt1 < 1e-4 {
        dt1 = 1.0;
    }
    if dt0 < 1e-4 {
        dt0 = dt1;
    }
    if dt2 < 1e-4 {
        dt2 = dt1;
    }

    let m0 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
    let m1 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;

    (m0 * dt1, m1 * dt1)
}
