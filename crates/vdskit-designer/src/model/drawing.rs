use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vdskit_core::LayerLabel;

use super::{Path, PathType};

/// A tree of named sub-models holding named paths.
///
/// Identifiers are unique within one model only. The optional layer tag
/// applies to the model and every descendant that has no tag of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, Path>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub models: IndexMap<String, Drawing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

/// A path reached while walking a drawing
#[derive(Debug, Clone)]
pub struct WalkedPath<'a> {
    /// Model identifiers from the root down to the owning model
    pub route: Vec<&'a str>,
    pub path_id: &'a str,
    pub path: &'a Path,
    /// Tag of the owning model or its nearest tagged ancestor
    pub layer: Option<&'a str>,
}

impl Drawing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_path(&mut self, id: impl Into<String>, path: Path) -> &mut Self {
        self.paths.insert(id.into(), path);
        self
    }

    pub fn add_model(&mut self, id: impl Into<String>, model: Drawing) -> &mut Self {
        self.models.insert(id.into(), model);
        self
    }

    /// Tag this model with a raw layer label
    pub fn set_layer(&mut self, layer: impl Into<String>) -> &mut Self {
        self.layer = Some(layer.into());
        self
    }

    /// Tag this model with a validated layer label
    pub fn set_label(&mut self, label: &LayerLabel) -> &mut Self {
        self.set_layer(label.to_string())
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.set_layer(layer);
        self
    }

    /// All paths in depth-first order: own paths first, then sub-models
    pub fn walk(&self) -> Vec<WalkedPath<'_>> {
        let mut out = Vec::new();
        self.walk_into(&mut Vec::new(), None, &mut out);
        out
    }

    fn walk_into<'a>(
        &'a self,
        route: &mut Vec<&'a str>,
        inherited: Option<&'a str>,
        out: &mut Vec<WalkedPath<'a>>,
    ) {
        let layer = self.layer.as_deref().or(inherited);
        for (id, path) in &self.paths {
            out.push(WalkedPath {
                route: route.clone(),
                path_id: id,
                path,
                layer,
            });
        }
        for (id, model) in &self.models {
            route.push(id);
            model.walk_into(route, layer, out);
            route.pop();
        }
    }

    pub fn path_count(&self) -> usize {
        self.paths.len() + self.models.values().map(Drawing::path_count).sum::<usize>()
    }

    /// True when the tree holds no path at all
    pub fn is_empty(&self) -> bool {
        self.path_count() == 0
    }

    /// Number of paths that carry real geometry
    pub fn real_path_count(&self) -> usize {
        self.walk()
            .iter()
            .filter(|walked| !walked.path.is_degenerate())
            .count()
    }

    /// Distinct path types in walk order
    pub fn path_types(&self) -> Vec<PathType> {
        let mut types = Vec::new();
        for walked in self.walk() {
            let kind = walked.path.kind();
            if !types.contains(&kind) {
                types.push(kind);
            }
        }
        types
    }

    /// Copy of the tree keeping only the paths `keep` accepts
    pub(crate) fn retain_paths(&self, keep: &impl Fn(&Path) -> bool) -> Drawing {
        Drawing {
            paths: self
                .paths
                .iter()
                .filter(|(_, path)| keep(path))
                .map(|(id, path)| (id.clone(), path.clone()))
                .collect(),
            models: self
                .models
                .iter()
                .map(|(id, model)| (id.clone(), model.retain_paths(keep)))
                .collect(),
            layer: self.layer.clone(),
        }
    }

    /// First identifier not yet used by a sub-model, starting from `base`
    pub(crate) fn free_model_id(&self, base: &str) -> String {
        if !self.models.contains_key(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|id| !self.models.contains_key(id))
            .unwrap_or_else(|| base.to_string())
    }
}
