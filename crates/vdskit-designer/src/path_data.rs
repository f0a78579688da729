//! Path-command grammar.
//!
//! Path data is read in the full SVG command set (`M L H V C S Q T A Z`,
//! absolute and relative, with implicit repeats) and normalised to the
//! absolute subset `M L C Q A Z`. The normalised form is what the extractor
//! hands to the model builder.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::arc::endpoint_to_center;
use crate::error::PathDataError;
use crate::model::Point;
use crate::transform::{Transform, TransformExt};

/// One absolute path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    QuadTo {
        ctrl: Point,
        to: Point,
    },
    ArcTo {
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    Close,
}

/// A normalised command sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Command(char),
    Number(String),
}

/// Split path data into command letters and number literals.
///
/// Handles commas and whitespace, splits on `+`/`-` when they begin a new
/// number (`10-5` -> `10`, `-5`) and on a second decimal point
/// (`.5.5` -> `.5`, `.5`), while keeping exponents intact.
fn tokenize(data: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    let flush = |current: &mut String, tokens: &mut Vec<Token>| {
        if !current.is_empty() {
            tokens.push(Token::Number(std::mem::take(current)));
        }
    };

    for ch in data.chars() {
        match ch {
            'M' | 'm' | 'L' | 'l' | 'H' | 'h' | 'V' | 'v' | 'C' | 'c' | 'S' | 's' | 'Q' | 'q'
            | 'T' | 't' | 'A' | 'a' | 'Z' | 'z' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Command(ch));
            }
            ' ' | ',' | '\n' | '\r' | '\t' => flush(&mut current, &mut tokens),
            '-' | '+' => {
                if !current.is_empty() && !matches!(current.chars().last(), Some('e' | 'E')) {
                    flush(&mut current, &mut tokens);
                }
                current.push(ch);
            }
            '.' => {
                if current.contains('.') && !current.contains(['e', 'E']) {
                    flush(&mut current, &mut tokens);
                }
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }
    flush(&mut current, &mut tokens);

    tokens
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    commands: Vec<Command>,
    current: Point,
    subpath_start: Point,
    prev_cubic_ctrl: Option<Point>,
    prev_quad_ctrl: Option<Point>,
}

impl Parser {
    fn new(data: &str) -> Self {
        Self {
            tokens: tokenize(data),
            pos: 0,
            commands: Vec::new(),
            current: Point::default(),
            subpath_start: Point::default(),
            prev_cubic_ctrl: None,
            prev_quad_ctrl: None,
        }
    }

    fn number(&mut self) -> Result<f64, PathDataError> {
        match self.tokens.get(self.pos) {
            Some(Token::Number(text)) => {
                let value = text.parse::<f64>().map_err(|_| {
                    PathDataError::new(self.pos, format!("'{text}' is not a number"))
                })?;
                if !value.is_finite() {
                    return Err(PathDataError::new(self.pos, format!("'{text}' is not finite")));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(Token::Command(c)) => Err(PathDataError::new(
                self.pos,
                format!("expected a number, found command '{c}'"),
            )),
            None => Err(PathDataError::new(self.pos, "unexpected end of path data")),
        }
    }

    /// Arc flags may be written without separators (`a1 1 0 0110 10`)
    fn flag(&mut self) -> Result<bool, PathDataError> {
        let pos = self.pos;
        let Some(Token::Number(text)) = self.tokens.get_mut(pos) else {
            return Err(PathDataError::new(pos, "expected an arc flag"));
        };
        let value = match text.chars().next() {
            Some('0') => false,
            Some('1') => true,
            _ => return Err(PathDataError::new(pos, format!("'{text}' is not an arc flag"))),
        };
        if text.len() > 1 {
            text.remove(0);
        } else {
            self.pos += 1;
        }
        Ok(value)
    }

    fn point(&mut self, relative: bool) -> Result<Point, PathDataError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(if relative {
            Point::new(self.current.x + x, self.current.y + y)
        } else {
            Point::new(x, y)
        })
    }

    fn push(&mut self, command: Command) {
        match command {
            Command::MoveTo(p) => {
                self.current = p;
                self.subpath_start = p;
            }
            Command::LineTo(to)
            | Command::CubicTo { to, .. }
            | Command::QuadTo { to, .. }
            | Command::ArcTo { to, .. } => self.current = to,
            Command::Close => self.current = self.subpath_start,
        }
        self.prev_cubic_ctrl = match command {
            Command::CubicTo { ctrl2, .. } => Some(ctrl2),
            _ => None,
        };
        self.prev_quad_ctrl = match command {
            Command::QuadTo { ctrl, .. } => Some(ctrl),
            _ => None,
        };
        self.commands.push(command);
    }

    fn reflect(&self, ctrl: Option<Point>) -> Point {
        ctrl.map(|c| Point::new(2.0 * self.current.x - c.x, 2.0 * self.current.y - c.y))
            .unwrap_or(self.current)
    }

    fn run(&mut self) -> Result<(), PathDataError> {
        let mut command: Option<char> = None;

        while self.pos < self.tokens.len() {
            let cmd = match &self.tokens[self.pos] {
                Token::Command(c) => {
                    self.pos += 1;
                    *c
                }
                Token::Number(_) => match command {
                    // Repeated coordinates after a move are implicit line-tos
                    Some('M') => 'L',
                    Some('m') => 'l',
                    Some('Z' | 'z') | None => {
                        return Err(PathDataError::new(self.pos, "coordinates without a command"))
                    }
                    Some(c) => c,
                },
            };
            if self.commands.is_empty() && !matches!(cmd, 'M' | 'm') {
                return Err(PathDataError::new(
                    self.pos.saturating_sub(1),
                    "path data must begin with a move-to",
                ));
            }
            let relative = cmd.is_ascii_lowercase();

            match cmd.to_ascii_uppercase() {
                'M' => {
                    let p = self.point(relative)?;
                    self.push(Command::MoveTo(p));
                }
                'L' => {
                    let p = self.point(relative)?;
                    self.push(Command::LineTo(p));
                }
                'H' => {
                    let x = self.number()?;
                    let x = if relative { self.current.x + x } else { x };
                    self.push(Command::LineTo(Point::new(x, self.current.y)));
                }
                'V' => {
                    let y = self.number()?;
                    let y = if relative { self.current.y + y } else { y };
                    self.push(Command::LineTo(Point::new(self.current.x, y)));
                }
                'C' => {
                    let ctrl1 = self.point(relative)?;
                    let ctrl2 = self.point(relative)?;
                    let to = self.point(relative)?;
                    self.push(Command::CubicTo { ctrl1, ctrl2, to });
                }
                'S' => {
                    let ctrl1 = self.reflect(self.prev_cubic_ctrl);
                    let ctrl2 = self.point(relative)?;
                    let to = self.point(relative)?;
                    self.push(Command::CubicTo { ctrl1, ctrl2, to });
                }
                'Q' => {
                    let ctrl = self.point(relative)?;
                    let to = self.point(relative)?;
                    self.push(Command::QuadTo { ctrl, to });
                }
                'T' => {
                    let ctrl = self.reflect(self.prev_quad_ctrl);
                    let to = self.point(relative)?;
                    self.push(Command::QuadTo { ctrl, to });
                }
                'A' => {
                    let rx = self.number()?;
                    let ry = self.number()?;
                    let x_rotation = self.number()?;
                    let large_arc = self.flag()?;
                    let sweep = self.flag()?;
                    let to = self.point(relative)?;
                    self.push(Command::ArcTo {
                        rx: rx.abs(),
                        ry: ry.abs(),
                        x_rotation,
                        large_arc,
                        sweep,
                        to,
                    });
                }
                'Z' => self.push(Command::Close),
                other => {
                    return Err(PathDataError::new(
                        self.pos,
                        format!("unsupported command '{other}'"),
                    ))
                }
            }

            command = Some(cmd);
        }
        Ok(())
    }
}

impl PathData {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// Parse path data, failing on the first grammar error.
    pub fn parse(data: &str) -> Result<Self, PathDataError> {
        let mut parser = Parser::new(data);
        parser.run()?;
        Ok(Self::new(parser.commands))
    }

    /// Parse path data the way renderers do: everything up to the first
    /// error is kept and the rest is dropped with a warning.
    pub fn parse_lossy(data: &str) -> Self {
        let mut parser = Parser::new(data);
        if let Err(e) = parser.run() {
            warn!("Truncating path data: {}", e);
        }
        Self::new(parser.commands)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Apply an affine transform to every command.
    ///
    /// Arcs stay arcs under similarity transforms. Elliptical arcs under
    /// reflections, and any arc under shear or non-uniform scale, are
    /// rewritten as cubic Béziers.
    pub fn transformed(&self, transform: &Transform) -> Self {
        if *transform == Transform::identity() {
            return self.clone();
        }

        let map = |p: Point| transform.apply(p);
        let similarity = transform.similarity();
        let mut out = Vec::with_capacity(self.commands.len());
        let mut current = Point::default();
        let mut subpath_start = Point::default();

        for command in &self.commands {
            match *command {
                Command::MoveTo(p) => {
                    subpath_start = p;
                    current = p;
                    out.push(Command::MoveTo(map(p)));
                }
                Command::LineTo(p) => {
                    current = p;
                    out.push(Command::LineTo(map(p)));
                }
                Command::CubicTo { ctrl1, ctrl2, to } => {
                    current = to;
                    out.push(Command::CubicTo {
                        ctrl1: map(ctrl1),
                        ctrl2: map(ctrl2),
                        to: map(to),
                    });
                }
                Command::QuadTo { ctrl, to } => {
                    current = to;
                    out.push(Command::QuadTo {
                        ctrl: map(ctrl),
                        to: map(to),
                    });
                }
                Command::ArcTo {
                    rx,
                    ry,
                    x_rotation,
                    large_arc,
                    sweep,
                    to,
                } => {
                    let from = current;
                    current = to;
                    let circular = (rx - ry).abs() <= f64::EPSILON * rx.max(ry).max(1.0);
                    match similarity {
                        Some((scale, rotation, reflected)) if circular || !reflected => {
                            out.push(Command::ArcTo {
                                rx: rx * scale,
                                ry: ry * scale,
                                x_rotation: if reflected {
                                    x_rotation
                                } else {
                                    x_rotation + rotation
                                },
                                large_arc,
                                sweep: sweep != reflected,
                                to: map(to),
                            });
                        }
                        _ => match endpoint_to_center(from, to, rx, ry, x_rotation, large_arc, sweep)
                        {
                            Some(arc) => {
                                for (ctrl1, ctrl2, end) in arc.to_cubics() {
                                    out.push(Command::CubicTo {
                                        ctrl1: map(ctrl1),
                                        ctrl2: map(ctrl2),
                                        to: map(end),
                                    });
                                }
                            }
                            None if from != to => out.push(Command::LineTo(map(to))),
                            None => {}
                        },
                    }
                }
                Command::Close => {
                    current = subpath_start;
                    out.push(Command::Close);
                }
            }
        }

        Self::new(out)
    }
}

impl FromStr for PathData {
    type Err = PathDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Round to 6 decimals, trim trailing zeros and never print `-0`.
pub(crate) fn format_number(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

fn write_point(f: &mut fmt::Formatter<'_>, p: Point) -> fmt::Result {
    write!(f, "{} {}", format_number(p.x), format_number(p.y))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Command::MoveTo(p) => {
                write!(f, "M ")?;
                write_point(f, p)
            }
            Command::LineTo(p) => {
                write!(f, "L ")?;
                write_point(f, p)
            }
            Command::CubicTo { ctrl1, ctrl2, to } => {
                write!(f, "C ")?;
                write_point(f, ctrl1)?;
                write!(f, " ")?;
                write_point(f, ctrl2)?;
                write!(f, " ")?;
                write_point(f, to)
            }
            Command::QuadTo { ctrl, to } => {
                write!(f, "Q ")?;
                write_point(f, ctrl)?;
                write!(f, " ")?;
                write_point(f, to)
            }
            Command::ArcTo {
                rx,
                ry,
                x_rotation,
                large_arc,
                sweep,
                to,
            } => {
                write!(
                    f,
                    "A {} {} {} {} {} ",
                    format_number(rx),
                    format_number(ry),
                    format_number(x_rotation),
                    u8::from(large_arc),
                    u8::from(sweep)
                )?;
                write_point(f, to)
            }
            Command::Close => write!(f, "Z"),
        }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}
