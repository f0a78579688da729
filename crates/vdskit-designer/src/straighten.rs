//! Curve flattening.
//!
//! Every arc and Bézier in a drawing is replaced by a polyline through
//! key points no further apart than the facet size. The input drawing is
//! never touched: each model is rebuilt from a read-only view of the
//! original plus a table of replacements.

use tracing::{debug, warn};

use crate::model::{Drawing, Path};

/// Facet size used when the caller does not supply a usable one
pub const DEFAULT_FACET_SIZE: f64 = 1.0;

/// Return a copy of `drawing` holding line paths only.
///
/// A non-line path `id` is removed from its model's paths and a sub-model
/// named `id` (or the first free `id_<n>`) takes its place in the same
/// model, holding lines `ShapeLine1..ShapeLineN`. Line paths pass through
/// unchanged, so straightening twice gives the same result as once.
pub fn straighten(drawing: &Drawing, facet_size: f64) -> Drawing {
    let facet_size = if facet_size.is_finite() && facet_size > 0.0 {
        facet_size
    } else {
        warn!(
            "Invalid facet size {}, using {}",
            facet_size, DEFAULT_FACET_SIZE
        );
        DEFAULT_FACET_SIZE
    };
    rebuild(drawing, facet_size)
}

fn rebuild(model: &Drawing, facet_size: f64) -> Drawing {
    let replacements: Vec<(&str, Drawing)> = model
        .paths
        .iter()
        .filter(|(_, path)| !path.is_line())
        .map(|(id, path)| (id.as_str(), polyline(path, facet_size)))
        .collect();

    let mut out = Drawing {
        paths: model
            .paths
            .iter()
            .filter(|(_, path)| path.is_line())
            .map(|(id, path)| (id.clone(), path.clone()))
            .collect(),
        models: model
            .models
            .iter()
            .map(|(id, child)| (id.clone(), rebuild(child, facet_size)))
            .collect(),
        layer: model.layer.clone(),
    };

    for (id, replacement) in replacements {
        let model_id = out.free_model_id(id);
        debug!(
            "Straightened path {} into {} segments",
            id,
            replacement.paths.len()
        );
        out.models.insert(model_id, replacement);
    }
    out
}

fn polyline(path: &Path, facet_size: f64) -> Drawing {
    let mut model = Drawing::new();
    for (i, pair) in path.key_points(facet_size).windows(2).enumerate() {
        model.add_path(format!("ShapeLine{}", i + 1), Path::line(pair[0], pair[1]));
    }
    model
}
