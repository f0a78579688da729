//! Bounding extent of a drawing.

use serde::{Deserialize, Serialize};

use crate::model::{Drawing, Point};
use crate::straighten::straighten;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: Point,
    pub max: Point,
}

impl Extent {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    fn union(self, other: Extent) -> Extent {
        Extent {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// Extent of every non-degenerate path in the drawing.
///
/// `None` when there is no such path, so an anchor-only drawing has no
/// extent even though its anchor sits at the origin.
pub fn extent(drawing: &Drawing) -> Option<Extent> {
    bounds(&drawing.retain_paths(&|path| !path.is_degenerate()))
}

/// Extent of the drawing with its curves flattened to `facet_size`.
///
/// Degenerate paths are dropped before flattening, so the short chords of
/// a fine facet size still count as geometry.
pub fn flattened_extent(drawing: &Drawing, facet_size: f64) -> Option<Extent> {
    let source = drawing.retain_paths(&|path| !path.is_degenerate());
    bounds(&straighten(&source, facet_size))
}

fn bounds(drawing: &Drawing) -> Option<Extent> {
    drawing
        .walk()
        .into_iter()
        .map(|walked| {
            let (min, max) = walked.path.bounding_box();
            Extent { min, max }
        })
        .reduce(Extent::union)
}
