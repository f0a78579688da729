//! Serialising a drawing back to path data.
//!
//! Paths are chained end to start wherever they touch, so a polyline that
//! was split into separate line paths comes back as one `M ... L ...` run.
//! Chains that return to their starting point end with `Z`.

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::model::{Drawing, Path, Point};
use crate::path_data::{Command, PathData};

/// A path as traversed within a chain
#[derive(Debug, Clone, Copy)]
struct Step<'a> {
    path: &'a Path,
    reversed: bool,
}

impl Step<'_> {
    fn start(&self) -> Point {
        if self.reversed {
            self.path.end()
        } else {
            self.path.start()
        }
    }

    fn end(&self) -> Point {
        if self.reversed {
            self.path.start()
        } else {
            self.path.end()
        }
    }

    fn commands(&self, out: &mut Vec<Command>) {
        match self.path {
            Path::Arc {
                center,
                radius,
                start_angle,
                ..
            } => {
                let span = self.path.arc_span();
                let sweep = !self.reversed;
                let arc_to = |to: Point, large_arc: bool| Command::ArcTo {
                    rx: *radius,
                    ry: *radius,
                    x_rotation: 0.0,
                    large_arc,
                    sweep,
                    to,
                };
                if span >= 360.0 - 1e-9 {
                    let opposite = Point::on_circle(*center, *radius, start_angle + 180.0);
                    out.push(arc_to(opposite, false));
                    out.push(arc_to(self.end(), false));
                } else {
                    out.push(arc_to(self.end(), span > 180.0));
                }
            }
            path => {
                let path = if self.reversed {
                    path.reversed()
                } else {
                    path.clone()
                };
                match path {
                    Path::Line { end, .. } => out.push(Command::LineTo(end)),
                    Path::Quadratic { control, end, .. } => out.push(Command::QuadTo {
                        ctrl: control,
                        to: end,
                    }),
                    Path::Cubic {
                        control1,
                        control2,
                        end,
                        ..
                    } => out.push(Command::CubicTo {
                        ctrl1: control1,
                        ctrl2: control2,
                        to: end,
                    }),
                    Path::Arc { .. } => {}
                }
            }
        }
    }
}

/// Greedily link paths into chains: forward from the tail first, then
/// backward from the head
fn chains<'a>(paths: &[&'a Path]) -> Vec<VecDeque<Step<'a>>> {
    let mut used = vec![false; paths.len()];
    let mut out = Vec::new();

    for first in 0..paths.len() {
        if used[first] {
            continue;
        }
        used[first] = true;
        let mut chain = VecDeque::from([Step {
            path: paths[first],
            reversed: false,
        }]);

        while let Some(tail) = chain.back().map(Step::end) {
            let Some(step) = take_touching(paths, &mut used, tail, true) else {
                break;
            };
            chain.push_back(step);
        }
        while let Some(head) = chain.front().map(Step::start) {
            let Some(step) = take_touching(paths, &mut used, head, false) else {
                break;
            };
            chain.push_front(step);
        }

        out.push(chain);
    }
    out
}

/// First unused path that continues from `at` (or leads into it)
fn take_touching<'a>(
    paths: &[&'a Path],
    used: &mut [bool],
    at: Point,
    forward: bool,
) -> Option<Step<'a>> {
    for (i, path) in paths.iter().enumerate() {
        if used[i] {
            continue;
        }
        let (near, far) = if forward {
            (path.start(), path.end())
        } else {
            (path.end(), path.start())
        };
        let reversed = if near.coincides(&at) {
            false
        } else if far.coincides(&at) {
            true
        } else {
            continue;
        };
        used[i] = true;
        return Some(Step {
            path: *path,
            reversed,
        });
    }
    None
}

fn serialize(paths: &[&Path]) -> String {
    let mut commands = Vec::new();
    for chain in chains(paths) {
        let (Some(first), Some(last)) = (chain.front(), chain.back()) else {
            continue;
        };
        let start = first.start();
        let closed = last.end().coincides(&start);
        commands.push(Command::MoveTo(start));
        for step in &chain {
            step.commands(&mut commands);
        }
        if closed {
            commands.push(Command::Close);
        }
    }
    PathData::new(commands).to_string()
}

/// Path data of every non-degenerate path in the drawing
pub fn path_data(drawing: &Drawing) -> String {
    let walked = drawing.walk();
    let paths: Vec<&Path> = walked
        .iter()
        .map(|w| w.path)
        .filter(|path| !path.is_degenerate())
        .collect();
    serialize(&paths)
}

/// Path data grouped by effective layer tag, in order of first appearance.
///
/// Paths without a tag are grouped under `""`. Groups holding only
/// degenerate paths are left out.
pub fn path_data_by_layer(drawing: &Drawing) -> IndexMap<String, String> {
    let mut groups: IndexMap<&str, Vec<&Path>> = IndexMap::new();
    for walked in drawing.walk() {
        if !walked.path.is_degenerate() {
            groups
                .entry(walked.layer.unwrap_or(""))
                .or_default()
                .push(walked.path);
        }
    }

    groups
        .into_iter()
        .map(|(layer, paths)| (layer.to_string(), serialize(&paths)))
        .collect()
}
