//! Elliptical arc conversion between the SVG endpoint form and the
//! center form, plus approximation by cubic Béziers.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::model::Point;

/// An elliptical arc in center form. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CenterArc {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    pub phi: f64,
    pub theta1: f64,
    pub delta: f64,
}

impl CenterArc {
    pub fn is_circular(&self) -> bool {
        (self.rx - self.ry).abs() <= 1e-9 * self.rx.max(self.ry).max(1.0)
    }

    fn point_at(&self, u: f64, v: f64) -> Point {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Point::new(
            self.center.x + cos_phi * (self.rx * u) - sin_phi * (self.ry * v),
            self.center.y + sin_phi * (self.rx * u) + cos_phi * (self.ry * v),
        )
    }

    /// Cubic segments `(ctrl1, ctrl2, to)` of at most 90° each
    pub fn to_cubics(&self) -> Vec<(Point, Point, Point)> {
        let segment_count = ((self.delta.abs() / FRAC_PI_2).ceil() as usize).max(1);
        let delta_seg = self.delta / segment_count as f64;
        let k = 4.0 / 3.0 * (delta_seg / 4.0).tan();

        let mut theta = self.theta1;
        let mut cubics = Vec::with_capacity(segment_count);
        for _ in 0..segment_count {
            let next = theta + delta_seg;
            let (s0, c0) = theta.sin_cos();
            let (s1, c1) = next.sin_cos();
            cubics.push((
                self.point_at(c0 - k * s0, s0 + k * c0),
                self.point_at(c1 + k * s1, s1 - k * c1),
                self.point_at(c1, s1),
            ));
            theta = next;
        }
        cubics
    }
}

fn angle_between(u: (f64, f64), v: (f64, f64)) -> f64 {
    let dot = u.0 * v.0 + u.1 * v.1;
    let det = u.0 * v.1 - u.1 * v.0;
    det.atan2(dot)
}

/// Convert an SVG arc command into center form.
///
/// Returns `None` when the arc degenerates: zero radius or coincident
/// endpoints. Radii too small to span the endpoints are scaled up.
pub(crate) fn endpoint_to_center(
    from: Point,
    to: Point,
    rx: f64,
    ry: f64,
    x_rotation: f64,
    large_arc: bool,
    sweep: bool,
) -> Option<CenterArc> {
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx < f64::EPSILON || ry < f64::EPSILON || from == to {
        return None;
    }

    let phi = x_rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let x1p2 = x1p * x1p;
    let y1p2 = y1p * y1p;
    let denom = rx2 * y1p2 + ry2 * x1p2;
    if denom.abs() < f64::EPSILON {
        return None;
    }
    // clamp rounding noise
    let numer = (rx2 * ry2 - rx2 * y1p2 - ry2 * x1p2).max(0.0);

    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let coef = sign * (numer / denom).sqrt();
    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * (-ry * x1p / rx);

    let center = Point::new(
        cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0,
        sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0,
    );

    let u = ((x1p - cxp) / rx, (y1p - cyp) / ry);
    let v = ((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let theta1 = angle_between((1.0, 0.0), u);
    let mut delta = angle_between(u, v);
    if !sweep && delta > 0.0 {
        delta -= TAU;
    } else if sweep && delta < 0.0 {
        delta += TAU;
    }

    Some(CenterArc {
        center,
        rx,
        ry,
        phi,
        theta1,
        delta,
    })
}
