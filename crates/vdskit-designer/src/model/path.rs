use lyon::geom::{CubicBezierSegment, QuadraticBezierSegment};
use serde::{Deserialize, Serialize};

use super::{Point, POINT_TOLERANCE};

/// Tolerance used when measuring curve lengths
const LENGTH_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    Line,
    Arc,
    Quadratic,
    Cubic,
}

/// A single geometric primitive.
///
/// Arcs are circular and run in the direction of increasing angle from
/// `start_angle` to `end_angle`, both in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Path {
    Line {
        origin: Point,
        end: Point,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Quadratic {
        origin: Point,
        control: Point,
        end: Point,
    },
    Cubic {
        origin: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
}

impl Path {
    pub fn line(origin: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self::Line {
            origin: origin.into(),
            end: end.into(),
        }
    }

    pub fn arc(center: impl Into<Point>, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self::Arc {
            center: center.into(),
            radius,
            start_angle,
            end_angle,
        }
    }

    pub fn kind(&self) -> PathType {
        match self {
            Self::Line { .. } => PathType::Line,
            Self::Arc { .. } => PathType::Arc,
            Self::Quadratic { .. } => PathType::Quadratic,
            Self::Cubic { .. } => PathType::Cubic,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Self::Line { .. })
    }

    pub fn start(&self) -> Point {
        match self {
            Self::Line { origin, .. }
            | Self::Quadratic { origin, .. }
            | Self::Cubic { origin, .. } => *origin,
            Self::Arc {
                center,
                radius,
                start_angle,
                ..
            } => Point::on_circle(*center, *radius, *start_angle),
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Self::Line { end, .. } | Self::Quadratic { end, .. } | Self::Cubic { end, .. } => *end,
            Self::Arc {
                center,
                radius,
                start_angle,
                ..
            } => Point::on_circle(*center, *radius, start_angle + self.arc_span()),
        }
    }

    /// Swept angle of an arc in degrees, in `0..=360`; zero for other paths
    pub fn arc_span(&self) -> f64 {
        match self {
            Self::Arc {
                start_angle,
                end_angle,
                ..
            } => {
                let mut span = end_angle - start_angle;
                while span < 0.0 {
                    span += 360.0;
                }
                span.min(360.0)
            }
            _ => 0.0,
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Self::Line { origin, end } => origin.distance_to(end),
            Self::Arc { radius, .. } => radius.abs() * self.arc_span().to_radians(),
            Self::Quadratic { .. } | Self::Cubic { .. } => {
                self.as_cubic().approximate_length(LENGTH_TOLERANCE)
            }
        }
    }

    /// Zero-length paths carry no geometry worth measuring or exporting
    pub fn is_degenerate(&self) -> bool {
        self.length() <= POINT_TOLERANCE
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounding_box(&self) -> (Point, Point) {
        match self {
            Self::Line { origin, end } => (
                Point::new(origin.x.min(end.x), origin.y.min(end.y)),
                Point::new(origin.x.max(end.x), origin.y.max(end.y)),
            ),
            Self::Arc {
                center,
                radius,
                start_angle,
                ..
            } => {
                let span = self.arc_span();
                let mut points = vec![self.start(), self.end()];
                // Axis extremes reached inside the sweep
                let mut quadrant = (start_angle / 90.0).ceil() * 90.0;
                while quadrant < start_angle + span {
                    points.push(Point::on_circle(*center, *radius, quadrant));
                    quadrant += 90.0;
                }
                bounds_of(&points)
            }
            Self::Quadratic { .. } | Self::Cubic { .. } => {
                let bb = self.as_cubic().bounding_box();
                (Point::from_lyon(bb.min), Point::from_lyon(bb.max))
            }
        }
    }

    /// Ordered points along the path, consecutive points no further apart
    /// than `facet_size`. Lines yield their two endpoints.
    pub fn key_points(&self, facet_size: f64) -> Vec<Point> {
        let segments = |length: f64| ((length / facet_size).ceil() as usize).max(1);
        match self {
            Self::Line { origin, end } => vec![*origin, *end],
            Self::Arc {
                center,
                radius,
                start_angle,
                ..
            } => {
                let span = self.arc_span();
                let n = segments(self.length());
                (0..=n)
                    .map(|i| {
                        let angle = start_angle + span * i as f64 / n as f64;
                        Point::on_circle(*center, *radius, angle)
                    })
                    .collect()
            }
            Self::Quadratic { .. } | Self::Cubic { .. } => {
                let curve = self.as_cubic();
                // 3 * longest control leg bounds the curve's speed in t
                let legs = [
                    curve.from.distance_to(curve.ctrl1),
                    curve.ctrl1.distance_to(curve.ctrl2),
                    curve.ctrl2.distance_to(curve.to),
                ];
                let n = segments(3.0 * legs.iter().copied().fold(0.0, f64::max));
                (0..=n)
                    .map(|i| Point::from_lyon(curve.sample(i as f64 / n as f64)))
                    .collect()
            }
        }
    }

    /// The same geometry traversed from end to start.
    ///
    /// Arcs have no direction of their own, so they come back unchanged.
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line { origin, end } => Self::Line {
                origin: *end,
                end: *origin,
            },
            Self::Arc { .. } => self.clone(),
            Self::Quadratic {
                origin,
                control,
                end,
            } => Self::Quadratic {
                origin: *end,
                control: *control,
                end: *origin,
            },
            Self::Cubic {
                origin,
                control1,
                control2,
                end,
            } => Self::Cubic {
                origin: *end,
                control1: *control2,
                control2: *control1,
                end: *origin,
            },
        }
    }

    fn as_cubic(&self) -> CubicBezierSegment<f64> {
        match self {
            Self::Quadratic {
                origin,
                control,
                end,
            } => QuadraticBezierSegment {
                from: origin.to_lyon(),
                ctrl: control.to_lyon(),
                to: end.to_lyon(),
            }
            .to_cubic(),
            Self::Cubic {
                origin,
                control1,
                control2,
                end,
            } => CubicBezierSegment {
                from: origin.to_lyon(),
                ctrl1: control1.to_lyon(),
                ctrl2: control2.to_lyon(),
                to: end.to_lyon(),
            },
            Self::Line { origin, end } => CubicBezierSegment {
                from: origin.to_lyon(),
                ctrl1: origin.to_lyon(),
                ctrl2: end.to_lyon(),
                to: end.to_lyon(),
            },
            Self::Arc { .. } => {
                let (start, end) = (self.start(), self.end());
                CubicBezierSegment {
                    from: start.to_lyon(),
                    ctrl1: start.to_lyon(),
                    ctrl2: end.to_lyon(),
                    to: end.to_lyon(),
                }
            }
        }
    }
}

pub(crate) fn bounds_of(points: &[Point]) -> (Point, Point) {
    let mut min = Point::new(f64::MAX, f64::MAX);
    let mut max = Point::new(f64::MIN, f64::MIN);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}
