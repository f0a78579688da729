use vdskit_designer::{extent, model_from_path_data, Drawing, Path, PathType, Point};

#[test]
fn test_layer_inheritance_through_levels() {
    let mut leaf = Drawing::new();
    leaf.add_path("p_1", Path::line((0.0, 0.0), (1.0, 0.0)));
    let mut middle = Drawing::new();
    middle.add_model("leaf", leaf);
    let mut root = Drawing::new().with_layer("outer.normal.T40GREEN");
    root.add_model("middle", middle.clone());
    root.add_model("override", middle.with_layer("inner.decor.TPENGOLD"));

    let walked = root.walk();
    assert_eq!(walked.len(), 2);
    assert_eq!(walked[0].route, vec!["middle", "leaf"]);
    assert_eq!(walked[0].layer, Some("outer.normal.T40GREEN"));
    assert_eq!(walked[1].route, vec!["override", "leaf"]);
    assert_eq!(walked[1].layer, Some("inner.decor.TPENGOLD"));
}

#[test]
fn test_identifiers_are_local_to_a_model() {
    let a = model_from_path_data("M 0 0 L 1 0").unwrap();
    let b = model_from_path_data("M 5 5 L 6 5").unwrap();
    let mut root = Drawing::new();
    root.add_model("m_1", a);
    root.add_model("m_2", b);

    let ids: Vec<_> = root.walk().iter().map(|w| w.path_id).collect();
    assert_eq!(ids, vec!["p_1", "p_1"]);
    assert_eq!(root.path_count(), 2);
}

#[test]
fn test_extent_of_mixed_geometry() {
    let model = model_from_path_data("M 0 0 L 10 0 Q 15 5 10 10 A 5 5 0 0 1 0 10").unwrap();
    assert_eq!(
        model.path_types(),
        vec![PathType::Line, PathType::Quadratic, PathType::Arc]
    );
    let bounds = extent(&model).unwrap();
    // the arc bulges down to y = 15 on its way back to x = 0
    assert!(bounds.min.coincides(&Point::new(0.0, 0.0)));
    assert!((bounds.max.x - 12.5).abs() < 1e-6);
    assert!((bounds.height() - 15.0).abs() < 1e-9);
}

#[test]
fn test_drawing_serializes_as_tree() {
    let mut root = Drawing::new().with_layer("NOCUT..");
    root.add_path("_", Path::line((0.0, 0.0), (0.0, 0.0)));
    root.add_model("m_1", model_from_path_data("M 0 0 A 1 1 0 0 1 2 0").unwrap());

    let json = serde_json::to_value(&root).unwrap();
    assert_eq!(json["layer"], "NOCUT..");
    assert_eq!(json["paths"]["_"]["type"], "line");
    assert_eq!(json["models"]["m_1"]["paths"]["p_1"]["type"], "arc");
    assert!(json["models"]["m_1"].get("models").is_none());

    let back: Drawing = serde_json::from_value(json).unwrap();
    assert_eq!(back, root);
}
