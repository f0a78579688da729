use vdskit_designer::{
    model_from_path_data, path_data, to_drawing, to_path_data, Drawing, PathType, ANCHOR_ID,
};

/// Undirected line segments of some path data, rounded to 1e-6
fn segments(data: &str) -> Vec<[(i64, i64); 2]> {
    let model = model_from_path_data(data).expect("valid path data");
    let round = |v: f64| (v * 1e6).round() as i64;
    let mut out: Vec<[(i64, i64); 2]> = model
        .walk()
        .iter()
        .map(|walked| {
            assert_eq!(walked.path.kind(), PathType::Line);
            let (a, b) = (walked.path.start(), walked.path.end());
            let mut pair = [(round(a.x), round(a.y)), (round(b.x), round(b.y))];
            pair.sort();
            pair
        })
        .collect();
    out.sort();
    out
}

fn drawn(svg: &str) -> String {
    path_data(&to_drawing(svg).expect("well-formed svg"))
}

#[test]
fn test_base_path() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <path d="M 0 0 L 0 10 10 10"/>
    </svg>"#;
    assert_eq!(to_path_data(svg).unwrap(), vec!["M 0 0 L 0 10 L 10 10"]);
    assert_eq!(drawn(svg), "M 0 0 L 0 10 L 10 10");
}

#[test]
fn test_line_elements_match_multi_point_path() {
    let lines = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <line x1="0" y1="0" x2="0" y2="10"/>
        <line x1="0" y1="10" x2="10" y2="10"/>
    </svg>"#;
    let path = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <path d="M 0 0 L 0 10 10 10"/>
    </svg>"#;
    assert_eq!(drawn(lines), drawn(path));
}

#[test]
fn test_nested_groups() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <g>
            <g>
                <path d="M 0 0 L 0 10"/>
            </g>
        </g>
        <path d="M 0 10 L 10 10"/>
    </svg>"#;
    assert_eq!(drawn(svg), "M 0 0 L 0 10 L 10 10");
}

#[test]
fn test_nested_transform() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <g transform="translate(10 0)">
            <path d="M 0 0 L 0 10" transform="translate(0 10)"/>
        </g>
        <path d="M 0 0 L 0 10 10 10"/>
    </svg>"#;
    let data = drawn(svg);
    assert_eq!(data, "M 0 0 L 0 10 L 10 10 L 10 20");
    assert_eq!(segments(&data), segments("M 10 20 L 10 10 L 0 10 L 0 0"));
}

#[test]
fn test_two_level_transform_matches_combined() {
    let nested = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <g transform="translate(10,0)">
            <g transform="translate(0,10)">
                <path d="M0,0 L0,10"/>
            </g>
        </g>
    </svg>"#;
    let combined = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <path d="M0,0 L0,10" transform="translate(10,10)"/>
    </svg>"#;
    assert_eq!(to_path_data(nested).unwrap(), to_path_data(combined).unwrap());
    assert_eq!(to_path_data(nested).unwrap(), vec!["M 10 10 L 10 20"]);
}

#[test]
fn test_sibling_transform_does_not_leak() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <g>
            <path d="M 0 0 L 1 0" transform="translate(100 100)"/>
            <path d="M 0 0 L 1 0"/>
        </g>
    </svg>"#;
    assert_eq!(
        to_path_data(svg).unwrap(),
        vec!["M 100 100 L 101 100", "M 0 0 L 1 0"]
    );
}

#[test]
fn test_empty_elements_do_not_stop_traversal() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <path d="">
            <path d="M 1 1 L 2 2"/>
        </path>
        <g transform="scale(2)"><rect/><circle r="1"/></g>
    </svg>"#;
    let data = to_path_data(svg).unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0], "M 1 1 L 2 2");
    assert_eq!(data[1], "M 2 0 A 2 2 0 0 1 -2 0 A 2 2 0 0 1 2 0 Z");
}

#[test]
fn test_relative_and_lossy_path_data() {
    let svg = r#"<svg><path d="m 5 5 h 10 v 10 q 0 5 -5 5 L"/></svg>"#;
    assert_eq!(
        to_path_data(svg).unwrap(),
        vec!["M 5 5 L 15 5 L 15 15 Q 15 20 10 20"]
    );
}

#[test]
fn test_sub_model_naming() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <rect x="0" y="0" width="5" height="5"/>
        <g><line x1="0" y1="0" x2="1" y2="1"/></g>
        <ellipse cx="0" cy="0" rx="4" ry="2"/>
    </svg>"#;
    let drawing = to_drawing(svg).unwrap();
    assert_eq!(
        drawing.models.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["m_1", "m_2", "m_3"]
    );
    assert_eq!(drawing.models["m_1"].paths.len(), 4);
    assert_eq!(drawing.models["m_3"].path_types(), vec![PathType::Cubic]);
    assert!(drawing.paths.contains_key(ANCHOR_ID));
}

#[test]
fn test_empty_content_is_not_a_failure() {
    for svg in ["<svg></svg>", "", "<svg><g><text>label</text></g></svg>"] {
        let drawing = to_drawing(svg).unwrap();
        assert_eq!(drawing.path_count(), 1, "source {svg:?}");
        assert_eq!(drawing.real_path_count(), 0);
        assert!(drawing.models.is_empty());
    }
    assert_ne!(to_drawing("<svg></svg>").unwrap(), Drawing::new());
}

#[test]
fn test_malformed_source_is_a_parse_failure() {
    for svg in ["<svg>", "not xml at all", "<svg><path></svg>"] {
        let err = to_drawing(svg).unwrap_err();
        assert!(err.is_parse_failure(), "source {svg:?}");
    }
}

#[test]
fn test_doctype_prefixed_document() {
    let svg = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" version="1.1">
    <path d="M 0 0 L 0 10"/>
</svg>"#;
    let drawing = to_drawing(svg).unwrap();
    assert_eq!(drawing.real_path_count(), 1);
    assert_eq!(drawn(svg), "M 0 0 L 0 10");
}

#[test]
fn test_children_of_non_drawing_containers_are_visited() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <defs><path d="M 0 0 L 5 0"/></defs>
        <symbol><g transform="translate(0 5)"><line x1="0" y1="0" x2="5" y2="0"/></g></symbol>
    </svg>"#;
    assert_eq!(
        to_path_data(svg).unwrap(),
        vec!["M 0 0 L 5 0", "M 0 5 L 5 5"]
    );
}
