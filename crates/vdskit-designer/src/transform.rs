//! Affine transforms written in the SVG `transform` attribute grammar.

use lyon::geom::euclid::default::Transform2D;
use tracing::warn;

use crate::model::Point;

pub type Transform = Transform2D<f64>;

/// Point mapping and classification helpers on [`Transform`].
pub trait TransformExt {
    fn apply(&self, p: Point) -> Point;

    /// `(scale, rotation in degrees, reflected)` when the transform keeps
    /// circles circular, `None` for shears and non-uniform scales
    fn similarity(&self) -> Option<(f64, f64, bool)>;
}

impl TransformExt for Transform {
    fn apply(&self, p: Point) -> Point {
        Point::from_lyon(self.transform_point(p.to_lyon()))
    }

    fn similarity(&self) -> Option<(f64, f64, bool)> {
        let (a, b, c, d) = (self.m11, self.m12, self.m21, self.m22);
        let len_x = a.hypot(b);
        let len_y = c.hypot(d);
        let eps = 1e-9 * len_x.max(len_y).max(1.0);
        if len_x <= eps || (len_x - len_y).abs() > eps || (a * c + b * d).abs() > eps {
            return None;
        }
        let reflected = a * d - b * c < 0.0;
        Some((len_x, b.atan2(a).to_degrees(), reflected))
    }
}

/// Split an argument list on whitespace, commas and sign boundaries
pub(crate) fn parse_numbers(args: &str) -> Option<Vec<f64>> {
    let mut out = Vec::new();
    let mut current = String::new();
    for ch in args.chars().chain(std::iter::once(' ')) {
        let boundary = match ch {
            ' ' | ',' | '\n' | '\r' | '\t' => true,
            '-' | '+' => !current.is_empty() && !current.ends_with(['e', 'E']),
            _ => false,
        };
        if boundary && !current.is_empty() {
            out.push(current.parse::<f64>().ok().filter(|v| v.is_finite())?);
            current.clear();
        }
        if !matches!(ch, ' ' | ',' | '\n' | '\r' | '\t') {
            current.push(ch);
        }
    }
    Some(out)
}

fn function(name: &str, args: &[f64]) -> Option<Transform> {
    let transform = match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Transform::new(a, b, c, d, e, f),
        ("translate", &[tx]) => Transform::translation(tx, 0.0),
        ("translate", &[tx, ty]) => Transform::translation(tx, ty),
        ("scale", &[s]) => Transform::scale(s, s),
        ("scale", &[sx, sy]) => Transform::scale(sx, sy),
        ("rotate", &[angle]) => rotation(angle),
        ("rotate", &[angle, cx, cy]) => Transform::translation(-cx, -cy)
            .then(&rotation(angle))
            .then(&Transform::translation(cx, cy)),
        ("skewX", &[angle]) => Transform::new(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0),
        ("skewY", &[angle]) => Transform::new(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0),
        _ => return None,
    };
    Some(transform)
}

fn rotation(degrees: f64) -> Transform {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Transform::new(cos, sin, -sin, cos, 0.0, 0.0)
}

/// Parse a transform list such as `translate(10 0) rotate(45, 5, 5)`.
///
/// Functions apply right to left, as in SVG. Unknown functions and bad
/// argument lists are skipped with a warning; a list that stops making
/// sense is cut off at that point.
pub fn parse_transform(text: &str) -> Transform {
    let mut result = Transform::identity();
    let mut rest = text;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }
        let Some(open) = rest.find('(') else {
            warn!("Ignoring trailing transform text '{}'", rest);
            break;
        };
        let Some(close) = rest[open..].find(')').map(|i| open + i) else {
            warn!("Unterminated transform function in '{}'", rest);
            break;
        };
        let name = rest[..open].trim();
        let args = &rest[open + 1..close];
        rest = &rest[close + 1..];

        match parse_numbers(args).and_then(|values| function(name, &values)) {
            Some(f) => result = f.then(&result),
            None => warn!("Ignoring transform function {}({})", name, args),
        }
    }

    result
}
