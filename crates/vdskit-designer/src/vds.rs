//! VDS job generation.
//!
//! A VDS job is one XML document per sheet. Each document carries the
//! drawing's overall size in a `Passepartout` block and one numbered path
//! group per layer label cut on that sheet.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use vdskit_core::{LayerLabel, SheetCut};

use crate::export::path_data_by_layer;
use crate::measure::flattened_extent;
use crate::model::Drawing;
use crate::straighten::DEFAULT_FACET_SIZE;

/// XML text per sheet identifier, ordered by sheet
pub type VdsDocuments = BTreeMap<String, String>;

/// One path group bound for a sheet document
struct PathGroup<'a> {
    label: &'a str,
    figures: String,
    cut: &'a SheetCut,
}

/// Generator for VDS documents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VdsGenerator {
    /// Facet size used to flatten curves before measuring the extent
    pub facet_size: f64,
}

impl Default for VdsGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl VdsGenerator {
    pub fn new() -> Self {
        Self {
            facet_size: DEFAULT_FACET_SIZE,
        }
    }

    pub fn with_facet_size(facet_size: f64) -> Self {
        Self { facet_size }
    }

    /// Generate one document per sheet.
    ///
    /// Returns `None` when the drawing has no measurable extent. A drawing
    /// whose geometry is all reference-only or carries unreadable labels
    /// still has an extent and yields an empty map.
    pub fn generate(&self, drawing: &Drawing) -> Option<VdsDocuments> {
        let Some(extent) = flattened_extent(drawing, self.facet_size) else {
            info!("Drawing has no measurable extent, nothing to export");
            return None;
        };
        let width = extent.width().ceil();
        let height = extent.height().ceil();

        let groups = path_data_by_layer(drawing);
        let labels: Vec<(&str, LayerLabel)> = groups
            .keys()
            .filter_map(|label| match LayerLabel::parse(label) {
                Ok(parsed) => Some((label.as_str(), parsed)),
                Err(e) => {
                    warn!("Dropping paths with label '{}': {}", label, e);
                    None
                }
            })
            .collect();

        let mut sheets: BTreeMap<&str, Vec<PathGroup<'_>>> = BTreeMap::new();
        for &(label, ref parsed) in &labels {
            let LayerLabel::Cut(cut) = parsed else {
                debug!("Skipping reference-only paths");
                continue;
            };
            let figures = groups[label].replace(['z', 'Z'], "");
            sheets.entry(cut.sheet()).or_default().push(PathGroup {
                label,
                figures: figures.split_whitespace().collect::<Vec<_>>().join(" "),
                cut,
            });
        }

        let documents: VdsDocuments = sheets
            .into_iter()
            .map(|(sheet, paths)| (sheet.to_string(), document(sheet, width, height, &paths)))
            .collect();

        info!(
            "Generated {} VDS document(s), extent {}x{}",
            documents.len(),
            width,
            height
        );
        Some(documents)
    }
}

/// Generate VDS documents with the default facet size
pub fn to_vds(drawing: &Drawing) -> Option<VdsDocuments> {
    VdsGenerator::new().generate(drawing)
}

/// Escape text for use in XML content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn document(sheet: &str, width: f64, height: f64, paths: &[PathGroup<'_>]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    xml.push_str("<VDS>\n");
    xml.push_str(&format!("  <Sheet>{}</Sheet>\n", escape_xml(sheet)));
    xml.push_str("  <Passepartout>\n");
    xml.push_str(&format!("    <Width>{width}</Width>\n"));
    xml.push_str(&format!("    <Height>{height}</Height>\n"));
    xml.push_str("  </Passepartout>\n");
    xml.push_str("  <Paths>\n");
    for (i, path) in paths.iter().enumerate() {
        xml.push_str(&path_group(i, width, height, path));
    }
    xml.push_str("  </Paths>\n");
    xml.push_str("</VDS>\n");
    xml
}

fn path_group(i: usize, width: f64, height: f64, path: &PathGroup<'_>) -> String {
    let mut xml = String::new();
    xml.push_str(&format!("    <Path{i}>\n"));

    xml.push_str(&format!("      <Identification{i}>\n"));
    xml.push_str(&format!("        <Index>{i}</Index>\n"));
    xml.push_str(&format!("        <Layer>{}</Layer>\n", escape_xml(path.label)));
    xml.push_str(&format!("      </Identification{i}>\n"));

    xml.push_str(&format!("      <MachinePosition{i}>\n"));
    xml.push_str(&format!("        <Width>{width}</Width>\n"));
    xml.push_str(&format!("        <Height>{height}</Height>\n"));
    xml.push_str(&format!("        <Geometry{i}>\n"));
    xml.push_str(&format!(
        "          <PathGeometry Figures=\"{}\" />\n",
        escape_xml(&path.figures)
    ));
    xml.push_str(&format!("        </Geometry{i}>\n"));
    xml.push_str(&format!("      </MachinePosition{i}>\n"));

    xml.push_str(&format!("      <Aperture{i}>\n"));
    xml.push_str(&format!("        <CutType>{}</CutType>\n", path.cut.cut().code()));
    xml.push_str(&format!("        <Tool>{}</Tool>\n", path.cut.tool()));
    xml.push_str(&format!("      </Aperture{i}>\n"));

    xml.push_str(&format!("    </Path{i}>\n"));
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Path;

    fn tagged(label: &str, from: (f64, f64), to: (f64, f64)) -> Drawing {
        let mut model = Drawing::new().with_layer(label);
        model.add_path("p_1", Path::line(from, to));
        model
    }

    #[test]
    fn test_single_sheet_document() {
        let mut root = Drawing::new();
        root.add_model("m_1", tagged("wood.decor.TPENGOLD", (0.0, 0.0), (10.5, 4.2)));

        let docs = to_vds(&root).unwrap();
        let expected = "\
<?xml version=\"1.0\" encoding=\"utf-8\"?>
<VDS>
  <Sheet>wood</Sheet>
  <Passepartout>
    <Width>11</Width>
    <Height>5</Height>
  </Passepartout>
  <Paths>
    <Path0>
      <Identification0>
        <Index>0</Index>
        <Layer>wood.decor.TPENGOLD</Layer>
      </Identification0>
      <MachinePosition0>
        <Width>11</Width>
        <Height>5</Height>
        <Geometry0>
          <PathGeometry Figures=\"M 0 0 L 10.5 4.2\" />
        </Geometry0>
      </MachinePosition0>
      <Aperture0>
        <CutType>3</CutType>
        <Tool>TPENGOLD</Tool>
      </Aperture0>
    </Path0>
  </Paths>
</VDS>
";
        assert_eq!(docs["wood"], expected);
    }

    #[test]
    fn test_close_commands_are_stripped() {
        let mut square = Drawing::new().with_layer("s.normal.T45BLUE");
        square.add_path("a", Path::line((0.0, 0.0), (1.0, 0.0)));
        square.add_path("b", Path::line((1.0, 0.0), (1.0, 1.0)));
        square.add_path("c", Path::line((1.0, 1.0), (0.0, 0.0)));
        let docs = to_vds(&square).unwrap();
        assert!(docs["s"].contains("Figures=\"M 0 0 L 1 0 L 1 1 L 0 0\""));
    }

    #[test]
    fn test_labels_sharing_a_sheet() {
        let mut root = Drawing::new();
        root.add_model("m_1", tagged("a.normal.T40GREEN", (0.0, 0.0), (1.0, 0.0)));
        root.add_model("m_2", tagged("a.debossing.TEMBVIOLET", (0.0, 1.0), (1.0, 1.0)));
        let docs = to_vds(&root).unwrap();
        let doc = &docs["a"];
        assert!(doc.contains("<Path1>"));
        assert!(doc.contains("<CutType>5</CutType>"));
        assert!(doc.contains("<Layer>a.debossing.TEMBVIOLET</Layer>"));
    }

    #[test]
    fn test_sheet_names_are_escaped() {
        let root = tagged("R&D<1>.reverse.T90GREY", (0.0, 0.0), (1.0, 1.0));
        let docs = to_vds(&root).unwrap();
        let doc = &docs["R&D<1>"];
        assert!(doc.contains("<Sheet>R&amp;D&lt;1&gt;</Sheet>"));
        assert!(doc.contains("<CutType>1</CutType>"));
    }

    #[test]
    fn test_unreadable_and_untagged_groups_are_dropped() {
        let mut root = Drawing::new();
        root.add_model("m_1", tagged("a.decor.T40GREEN", (0.0, 0.0), (1.0, 0.0)));
        let mut plain = Drawing::new();
        plain.add_path("p_1", Path::line((0.0, 0.0), (0.0, 3.0)));
        root.add_model("m_2", plain);
        assert_eq!(to_vds(&root), Some(VdsDocuments::new()));
    }

    #[test]
    fn test_extent_uses_flattened_curves() {
        let mut root = Drawing::new().with_layer("c.normal.T40GREEN");
        root.add_path("p_1", Path::arc((0.0, 0.0), 10.0, 0.0, 360.0));
        // five facets: a pentagon narrower than the circle
        let coarse = VdsGenerator::with_facet_size(13.0).generate(&root).unwrap();
        let fine = VdsGenerator::new().generate(&root).unwrap();
        assert!(coarse["c"].contains("<Width>19</Width>"));
        assert!(fine["c"].contains("<Width>20</Width>"));
        assert!(fine["c"].contains("Figures=\"M 10 0 A 10 10 0 0 1 -10 0 A 10 10 0 0 1 10 0\""));
    }

    #[test]
    fn test_fine_facet_size_still_exports() {
        let mut root = Drawing::new().with_layer("a.normal.T40GREEN");
        root.add_path("_", Path::line((0.0, 0.0), (0.0, 0.0)));
        root.add_path("p_1", Path::arc((1.0, 1.0), 1.0, 0.0, 360.0));

        let coarse = VdsGenerator::with_facet_size(1.0).generate(&root).unwrap();
        let fine = VdsGenerator::with_facet_size(1e-4).generate(&root).unwrap();
        assert_eq!(fine.len(), 1);
        assert!(fine["a"].contains("<Width>2</Width>"));
        assert_eq!(coarse.keys().collect::<Vec<_>>(), fine.keys().collect::<Vec<_>>());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;"
        );
    }
}
