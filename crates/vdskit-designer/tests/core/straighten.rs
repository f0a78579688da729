use proptest::prelude::*;
use vdskit_designer::{straighten, to_drawing, Drawing, Path, PathType, Point};

fn only_lines(drawing: &Drawing) -> bool {
    drawing.walk().iter().all(|w| w.path.kind() == PathType::Line)
}

#[test]
fn test_imported_curves_straighten() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <circle cx="0" cy="0" r="10"/>
        <ellipse cx="30" cy="0" rx="8" ry="3" transform="rotate(30)"/>
        <path d="M 0 20 Q 10 30 20 20 T 40 20"/>
        <path d="M 0 40 L 10 40"/>
    </svg>"#;
    let drawing = to_drawing(svg).unwrap();
    assert!(!only_lines(&drawing));

    let flat = straighten(&drawing, 1.0);
    assert!(only_lines(&flat));
    assert_eq!(straighten(&flat, 1.0), flat);
    // the plain line is untouched and keeps its place
    assert_eq!(flat.models["m_4"], drawing.models["m_4"]);
    // each curve became a sub-model under its own identifier
    assert!(flat.models["m_1"].paths.is_empty());
    assert_eq!(
        flat.models["m_1"].models.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["p_1", "p_2"]
    );
}

#[test]
fn test_polylines_are_connected() {
    let mut drawing = Drawing::new();
    drawing.add_path(
        "curve",
        Path::Cubic {
            origin: Point::new(0.0, 0.0),
            control1: Point::new(0.0, 20.0),
            control2: Point::new(30.0, -10.0),
            end: Point::new(30.0, 10.0),
        },
    );
    let flat = straighten(&drawing, 2.0);
    let lines: Vec<_> = flat.models["curve"].paths.values().collect();
    assert!(lines.len() > 1);
    assert!(lines[0].start().coincides(&Point::new(0.0, 0.0)));
    assert!(lines[lines.len() - 1].end().coincides(&Point::new(30.0, 10.0)));
    for pair in lines.windows(2) {
        assert!(pair[0].end().coincides(&pair[1].start()));
    }
    for line in &lines {
        assert!(line.length() <= 2.0 + 1e-9);
    }
}

fn point() -> impl Strategy<Value = Point> {
    (-100.0..100.0f64, -100.0..100.0f64).prop_map(|(x, y)| Point::new(x, y))
}

fn any_path() -> impl Strategy<Value = Path> {
    prop_oneof![
        (point(), point()).prop_map(|(a, b)| Path::line(a, b)),
        (point(), 0.5..50.0f64, 0.0..360.0f64, 1.0..360.0f64)
            .prop_map(|(c, r, start, span)| Path::arc(c, r, start, start + span)),
        (point(), point(), point()).prop_map(|(origin, control, end)| Path::Quadratic {
            origin,
            control,
            end,
        }),
        (point(), point(), point(), point()).prop_map(|(origin, control1, control2, end)| {
            Path::Cubic {
                origin,
                control1,
                control2,
                end,
            }
        }),
    ]
}

fn any_drawing() -> impl Strategy<Value = Drawing> {
    (
        prop::collection::vec(any_path(), 0..4),
        prop::collection::vec(prop::collection::vec(any_path(), 0..4), 0..3),
    )
        .prop_map(|(own, children)| {
            let mut root = Drawing::new();
            for (i, path) in own.into_iter().enumerate() {
                root.add_path(format!("p_{}", i + 1), path);
            }
            for (i, paths) in children.into_iter().enumerate() {
                let mut child = Drawing::new();
                for (j, path) in paths.into_iter().enumerate() {
                    child.add_path(format!("p_{}", j + 1), path);
                }
                root.add_model(format!("m_{}", i + 1), child);
            }
            root
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_straighten_is_idempotent(drawing in any_drawing(), facet in 0.5..10.0f64) {
        let once = straighten(&drawing, facet);
        prop_assert!(only_lines(&once));
        let twice = straighten(&once, facet);
        prop_assert!(only_lines(&twice));
        prop_assert_eq!(&twice, &once);
    }

    #[test]
    fn prop_straighten_leaves_input_alone(drawing in any_drawing()) {
        let before = drawing.clone();
        let _ = straighten(&drawing, 1.0);
        prop_assert_eq!(drawing, before);
    }
}
