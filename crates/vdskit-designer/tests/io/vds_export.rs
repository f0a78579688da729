use vdskit_core::{encode, LayerLabel};
use vdskit_designer::{path_data_by_layer, to_drawing, to_vds, Drawing, VdsDocuments, VdsGenerator};

const TWO_SHAPES: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
    <path d="M 0 0 L 0 10 10 10"/>
    <g transform="translate(20 0)">
        <rect x="0" y="0" width="5" height="5"/>
    </g>
</svg>"#;

fn label(sheet: &str, cut: &str, tool: &str) -> LayerLabel {
    LayerLabel::new(sheet, Some(cut), Some(tool)).expect("valid label")
}

fn tag_count(doc: &str, tag: &str) -> usize {
    doc.matches(&format!("<{tag}>")).count()
}

#[test]
fn test_whole_drawing_on_one_sheet() {
    let mut drawing = to_drawing(TWO_SHAPES).unwrap();
    drawing.set_label(&label("green", "normal", "T40GREEN"));

    let docs = to_vds(&drawing).unwrap();
    assert_eq!(docs.keys().collect::<Vec<_>>(), vec!["green"]);
    let doc = &docs["green"];
    assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<VDS>\n"));
    assert!(doc.contains("<Passepartout>\n    <Width>25</Width>\n    <Height>10</Height>\n"));
    assert_eq!(tag_count(doc, "Path0"), 1);
    assert_eq!(tag_count(doc, "Path1"), 0);
    assert!(doc.contains(
        "<PathGeometry Figures=\"M 0 0 L 0 10 L 10 10 M 20 0 L 25 0 L 25 5 L 20 5 L 20 0\" />"
    ));
    assert!(doc.contains("<CutType>0</CutType>\n        <Tool>T40GREEN</Tool>"));
}

#[test]
fn test_two_sheets_are_numbered_independently() {
    let mut drawing = to_drawing(TWO_SHAPES).unwrap();
    drawing.models["m_1"].set_label(&label("oak", "vgroove", "T40GREEN"));
    drawing.models["m_2"].set_label(&label("birch", "reverse", "T45BLUE"));

    let docs = to_vds(&drawing).unwrap();
    assert_eq!(docs.len(), 2);

    let oak = &docs["oak"];
    assert!(oak.contains("<Sheet>oak</Sheet>"));
    assert!(oak.contains("<Index>0</Index>"));
    assert!(oak.contains("<CutType>2</CutType>"));
    assert!(oak.contains("Figures=\"M 0 0 L 0 10 L 10 10\""));
    assert!(!oak.contains("birch"));

    let birch = &docs["birch"];
    assert!(birch.contains("<Path0>"));
    assert!(birch.contains("<Identification0>"));
    assert!(!birch.contains("<Path1>"));
    assert!(birch.contains("<CutType>1</CutType>"));
    assert!(birch.contains("<Tool>T45BLUE</Tool>"));
    // the whole drawing sizes every sheet
    assert!(birch.contains("<Width>25</Width>"));
}

#[test]
fn test_numbered_tags_pair_up() {
    let mut drawing = to_drawing(TWO_SHAPES).unwrap();
    drawing.models["m_1"].set_label(&label("s", "normal", "T90GREY"));
    drawing.models["m_2"].set_label(&label("s", "decor", "TPENGOLD"));

    let docs = to_vds(&drawing).unwrap();
    let doc = &docs["s"];
    for i in 0..2 {
        for tag in ["Path", "Identification", "MachinePosition", "Geometry", "Aperture"] {
            assert_eq!(doc.matches(&format!("<{tag}{i}>")).count(), 1);
            assert_eq!(doc.matches(&format!("</{tag}{i}>")).count(), 1);
        }
        assert!(doc.contains(&format!("<Index>{i}</Index>")));
    }
    let first = doc.find("<Path0>").unwrap();
    let second = doc.find("<Path1>").unwrap();
    assert!(first < second);
    assert!(doc[second..].contains("<CutType>3</CutType>"));
}

#[test]
fn test_sentinel_only_drawing_yields_empty_map() {
    let mut drawing = to_drawing(TWO_SHAPES).unwrap();
    drawing.set_label(&LayerLabel::NoCut);
    assert_eq!(drawing.layer.as_deref(), Some("NOCUT.."));
    assert_eq!(to_vds(&drawing), Some(VdsDocuments::new()));
}

#[test]
fn test_sentinel_groups_are_not_cut() {
    let mut drawing = to_drawing(TWO_SHAPES).unwrap();
    drawing.models["m_1"].set_layer(encode("NOCUT", None, None).unwrap());
    drawing.models["m_2"].set_label(&label("s", "normal", "T40GREEN"));

    let docs = to_vds(&drawing).unwrap();
    let doc = &docs["s"];
    assert_eq!(tag_count(doc, "Path0"), 1);
    assert!(!doc.contains("<Path1>"));
    assert!(!doc.contains("NOCUT"));
}

#[test]
fn test_empty_drawing_has_no_result() {
    let drawing = to_drawing("<svg></svg>").unwrap();
    assert_eq!(to_vds(&drawing), None);
    assert_eq!(to_vds(&Drawing::new()), None);

    // empty map and no result stay distinct
    let mut reference = to_drawing(TWO_SHAPES).unwrap();
    reference.set_label(&LayerLabel::NoCut);
    assert_ne!(to_vds(&reference), to_vds(&drawing));
}

#[test]
fn test_untagged_geometry_is_grouped_under_empty_label() {
    let drawing = to_drawing(TWO_SHAPES).unwrap();
    let groups = path_data_by_layer(&drawing);
    assert_eq!(groups.keys().collect::<Vec<_>>(), vec![""]);
    assert_eq!(to_vds(&drawing), Some(VdsDocuments::new()));
}

#[test]
fn test_curves_keep_their_commands() {
    let svg = r#"<svg><circle cx="10" cy="10" r="10"/><path d="M 0 30 C 0 40 20 40 20 30"/></svg>"#;
    let mut drawing = to_drawing(svg).unwrap();
    drawing.set_label(&label("c", "debossing", "TEMBVIOLET"));

    let docs = VdsGenerator::with_facet_size(0.5).generate(&drawing).unwrap();
    let doc = &docs["c"];
    assert!(doc.contains("A 10 10 0 0 1 0 10 A 10 10 0 0 1 20 10"));
    assert!(doc.contains("C 0 40 20 40 20 30"));
    assert!(!doc.contains(" Z"));
    assert!(doc.contains("<CutType>5</CutType>"));
    assert!(doc.contains("<Width>20</Width>"));
}

#[test]
fn test_fine_facet_size_keeps_curved_drawing() {
    let mut drawing = to_drawing(r#"<svg><circle cx="1" cy="1" r="1"/></svg>"#).unwrap();
    drawing.set_label(&label("a", "normal", "T40GREEN"));

    for facet_size in [1.0, 1e-4] {
        let docs = VdsGenerator::with_facet_size(facet_size)
            .generate(&drawing)
            .expect("curved drawing has an extent");
        assert_eq!(docs.len(), 1, "facet size {facet_size}");
        assert!(docs["a"].contains("<Width>2</Width>"));
    }
}
