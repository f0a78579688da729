//! # SVG Import
//!
//! Turns SVG source text into a [`Drawing`] in two stages.
//!
//! 1. [`to_path_data`] walks the element tree depth first, accumulates each
//!    element's `transform` attribute onto its ancestors' and converts every
//!    drawable element to a normalised, absolute path-data string with the
//!    transform already applied.
//! 2. [`to_drawing`] turns each string into a sub-model `m_<n>` of a root
//!    model that starts with a single zero-length anchor line.
//!
//! Supported elements: anything with a `d` attribute, `rect` (with rounded
//! corners), `circle`, `ellipse`, `line`, `polyline` and `polygon`.

use roxmltree::Node;
use tracing::{debug, info};

use crate::arc::endpoint_to_center;
use crate::error::Result;
use crate::model::{Drawing, Path, Point};
use crate::path_data::{format_number, Command, PathData};
use crate::transform::{parse_numbers, parse_transform};

/// Identifier of the zero-length line every imported drawing starts with
pub const ANCHOR_ID: &str = "_";

/// Extract one absolute path-data string per drawable element, in document
/// order. Empty or whitespace-only input yields no strings.
pub fn to_path_data(svg: &str) -> Result<Vec<String>> {
    if svg.trim().is_empty() {
        debug!("Empty SVG source");
        return Ok(Vec::new());
    }

    // DOCTYPE declarations are accepted
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let document = roxmltree::Document::parse_with_options(svg, options)?;
    let mut out = Vec::new();
    for child in document.root_element().children().filter(Node::is_element) {
        collect(child, "", &mut out);
    }

    debug!("Extracted {} path data strings", out.len());
    Ok(out)
}

fn collect(node: Node<'_, '_>, inherited: &str, out: &mut Vec<String>) {
    let name = node.tag_name().name();
    let transform = match node.attribute("transform") {
        Some(own) if !inherited.is_empty() => format!("{inherited} {own}"),
        Some(own) => own.to_string(),
        None => inherited.to_string(),
    };

    if let Some(data) = element_path_data(node) {
        let parsed = PathData::parse_lossy(&data);
        if parsed.is_empty() {
            debug!("Skipping <{}> without usable path data", name);
        } else {
            let placed = parsed.transformed(&parse_transform(&transform));
            out.push(placed.to_string());
        }
    }

    for child in node.children().filter(Node::is_element) {
        collect(child, &transform, out);
    }
}

fn length(node: Node<'_, '_>, attr: &str) -> Option<f64> {
    node.attribute(attr)?
        .trim()
        .trim_end_matches("px")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn coordinate(node: Node<'_, '_>, attr: &str) -> f64 {
    length(node, attr).unwrap_or(0.0)
}

fn positive(node: Node<'_, '_>, attr: &str) -> Option<f64> {
    length(node, attr).filter(|v| *v > 0.0)
}

/// Path data of an element, from its `d` attribute or its shape attributes
fn element_path_data(node: Node<'_, '_>) -> Option<String> {
    if let Some(d) = node.attribute("d") {
        return Some(d.to_string());
    }

    let n = format_number;
    match node.tag_name().name() {
        "rect" => rect_path_data(node),
        "circle" => {
            let (cx, cy) = (coordinate(node, "cx"), coordinate(node, "cy"));
            let r = positive(node, "r")?;
            Some(ellipse_path_data(cx, cy, r, r))
        }
        "ellipse" => {
            let (cx, cy) = (coordinate(node, "cx"), coordinate(node, "cy"));
            let rx = positive(node, "rx")?;
            let ry = positive(node, "ry")?;
            Some(ellipse_path_data(cx, cy, rx, ry))
        }
        "line" => Some(format!(
            "M {} {} L {} {}",
            n(coordinate(node, "x1")),
            n(coordinate(node, "y1")),
            n(coordinate(node, "x2")),
            n(coordinate(node, "y2"))
        )),
        tag @ ("polyline" | "polygon") => {
            let values = parse_numbers(node.attribute("points")?)?;
            let mut pairs = values.chunks_exact(2);
            let first = pairs.next()?;
            let mut data = format!("M {} {}", n(first[0]), n(first[1]));
            for pair in pairs {
                data.push_str(&format!(" L {} {}", n(pair[0]), n(pair[1])));
            }
            if tag == "polygon" {
                data.push_str(" Z");
            }
            Some(data)
        }
        _ => None,
    }
}

fn rect_path_data(node: Node<'_, '_>) -> Option<String> {
    let n = format_number;
    let (x, y) = (coordinate(node, "x"), coordinate(node, "y"));
    let width = positive(node, "width")?;
    let height = positive(node, "height")?;

    let (rx, ry) = match (positive(node, "rx"), positive(node, "ry")) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0.0, 0.0),
    };
    let rx = rx.min(width / 2.0);
    let ry = ry.min(height / 2.0);

    if rx <= 0.0 || ry <= 0.0 {
        return Some(format!(
            "M {} {} H {} V {} H {} Z",
            n(x),
            n(y),
            n(x + width),
            n(y + height),
            n(x)
        ));
    }

    let corner = |to_x: f64, to_y: f64| format!("A {} {} 0 0 1 {} {}", n(rx), n(ry), n(to_x), n(to_y));
    Some(format!(
        "M {} {} H {} {} V {} {} H {} {} V {} {} Z",
        n(x + rx),
        n(y),
        n(x + width - rx),
        corner(x + width, y + ry),
        n(y + height - ry),
        corner(x + width - rx, y + height),
        n(x + rx),
        corner(x, y + height - ry),
        n(y + ry),
        corner(x + rx, y),
    ))
}

/// A closed ellipse as two half arcs, starting at its rightmost point
fn ellipse_path_data(cx: f64, cy: f64, rx: f64, ry: f64) -> String {
    let n = format_number;
    format!(
        "M {x1} {y} A {rx} {ry} 0 0 1 {x2} {y} A {rx} {ry} 0 0 1 {x1} {y} Z",
        x1 = n(cx + rx),
        x2 = n(cx - rx),
        y = n(cy),
        rx = n(rx),
        ry = n(ry)
    )
}

/// Build a drawing from SVG source text.
///
/// The root model holds the anchor line [`ANCHOR_ID`] and one sub-model
/// `m_<n>` per extracted path-data string, numbered from 1 in document
/// order. A valid document without drawable content yields just the anchor.
pub fn to_drawing(svg: &str) -> Result<Drawing> {
    let path_data = to_path_data(svg)?;

    let mut drawing = Drawing::new();
    drawing.add_path(ANCHOR_ID, Path::line((0.0, 0.0), (0.0, 0.0)));
    for (i, data) in path_data.iter().enumerate() {
        drawing.add_model(format!("m_{}", i + 1), model_from_path_data(data)?);
    }

    info!(
        "Imported SVG: {} sub-models, {} paths",
        drawing.models.len(),
        drawing.real_path_count()
    );
    Ok(drawing)
}

/// Build one sub-model from normalised path data.
///
/// Paths are named `p_1`, `p_2`, ... in command order. Zero-length segments
/// are dropped and an open subpath closed with `Z` gets a closing line.
pub fn model_from_path_data(data: &str) -> Result<Drawing> {
    let commands: PathData = data.parse()?;
    let mut builder = ModelBuilder::default();
    for command in commands.commands() {
        builder.push(*command);
    }
    Ok(builder.model)
}

#[derive(Default)]
struct ModelBuilder {
    model: Drawing,
    count: usize,
    current: Point,
    subpath_start: Point,
}

impl ModelBuilder {
    fn add(&mut self, path: Path) {
        self.count += 1;
        self.model.add_path(format!("p_{}", self.count), path);
    }

    fn line_to(&mut self, to: Point) {
        if !self.current.coincides(&to) {
            self.add(Path::line(self.current, to));
        }
    }

    fn push(&mut self, command: Command) {
        let from = self.current;
        match command {
            Command::MoveTo(p) => {
                self.subpath_start = p;
            }
            Command::LineTo(to) => self.line_to(to),
            Command::CubicTo { ctrl1, ctrl2, to } => {
                if [ctrl1, ctrl2, to].iter().any(|p| !p.coincides(&from)) {
                    self.add(Path::Cubic {
                        origin: from,
                        control1: ctrl1,
                        control2: ctrl2,
                        end: to,
                    });
                }
            }
            Command::QuadTo { ctrl, to } => {
                if [ctrl, to].iter().any(|p| !p.coincides(&from)) {
                    self.add(Path::Quadratic {
                        origin: from,
                        control: ctrl,
                        end: to,
                    });
                }
            }
            Command::ArcTo {
                rx,
                ry,
                x_rotation,
                large_arc,
                sweep,
                to,
            } => match endpoint_to_center(from, to, rx, ry, x_rotation, large_arc, sweep) {
                Some(arc) if arc.is_circular() => {
                    let theta = (arc.theta1 + arc.phi).to_degrees();
                    let delta = arc.delta.to_degrees();
                    // Arcs always run in the increasing-angle direction
                    let start = if delta < 0.0 { theta + delta } else { theta };
                    let start = start.rem_euclid(360.0);
                    self.add(Path::arc(arc.center, arc.rx, start, start + delta.abs()));
                }
                Some(arc) => {
                    let mut origin = from;
                    for (control1, control2, end) in arc.to_cubics() {
                        self.add(Path::Cubic {
                            origin,
                            control1,
                            control2,
                            end,
                        });
                        origin = end;
                    }
                }
                None => self.line_to(to),
            },
            Command::Close => self.line_to(self.subpath_start),
        }

        self.current = match command {
            Command::MoveTo(p)
            | Command::LineTo(p)
            | Command::CubicTo { to: p, .. }
            | Command::QuadTo { to: p, .. }
            | Command::ArcTo { to: p, .. } => p,
            Command::Close => self.subpath_start,
        };
    }
}
