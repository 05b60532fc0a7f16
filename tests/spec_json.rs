use serde_json::json;

use sample_elem::domain::errors::SpecError;
use sample_elem::infrastructure::{MemoryEvent, MemoryHost};
use sample_elem::{ElemSpec, elem, make_elem};

type Spec = ElemSpec<MemoryEvent>;

const SAMPLE_CARD: &str = r#"
[
  "div",
  { "class": "sample", "data-name": "cube", "style": { "backgroundColor": "black" } },
  ["canvas", { "width": 300, "height": 150 }],
  ["p", "Depth Texture Preview"]
]
"#;

#[test]
fn json_document_builds_the_described_tree() {
    let host = MemoryHost::new();
    let spec = Spec::from_json_str(SAMPLE_CARD).unwrap();
    let card = make_elem(&host, &spec).unwrap();

    insta::assert_snapshot!(
        card.to_html(),
        @r#"<div class="sample" data-name="cube" style="background-color: black;"><canvas width="300" height="150"></canvas><p>Depth Texture Preview</p></div>"#
    );
}

#[test]
fn built_tree_serializes_back_to_sequence_form() {
    let host = MemoryHost::new();
    let card = make_elem(&host, &Spec::from_json_str(SAMPLE_CARD).unwrap()).unwrap();

    let expected = json!([
        "div",
        { "class": "sample", "data-name": "cube", "style": "background-color: black;" },
        ["canvas", { "width": "300", "height": "150" }],
        ["p", "Depth Texture Preview"]
    ]);
    assert_eq!(card.to_jsonml(), expected);

    // Reading the serialized form again yields an identical tree.
    let rebuilt = make_elem(&host, &Spec::try_from(&card.to_jsonml()).unwrap()).unwrap();
    assert_eq!(rebuilt.to_html(), card.to_html());
}

#[test]
fn json_and_macro_specs_build_equal_trees() {
    let host = MemoryHost::new();
    let from_json = make_elem(&host, &Spec::from_json_str(r#"["ul", ["li", "apple"], ["li", "banana"]]"#).unwrap());
    let from_macro = make_elem(&host, &elem!(["ul", ["li", "apple"], ["li", "banana"]]));

    assert_eq!(from_json.unwrap(), from_macro.unwrap());
}

#[test]
fn deserializes_through_serde() {
    let spec: Spec = serde_json::from_value(json!(["h1", { "textContent": "Title" }])).unwrap();
    let h1 = make_elem(&MemoryHost::new(), &spec).unwrap();

    assert_eq!(h1.text_content(), "Title");
}

#[test]
fn serde_reports_shape_errors() {
    let err = serde_json::from_value::<Spec>(json!([42])).unwrap_err();

    assert!(err.to_string().contains("Tag must be a string"), "unexpected message: {}", err);
}

#[test]
fn malformed_documents_are_rejected_before_building() {
    assert!(matches!(Spec::from_json_str("[\"div\""), Err(SpecError::Json(_))));
    assert_eq!(Spec::from_json_str("[]").unwrap_err(), SpecError::EmptySequence);
    assert_eq!(Spec::from_json_str("[null]").unwrap_err(), SpecError::InvalidTag { found: "null" });
    assert_eq!(
        Spec::from_json_str(r#"["div", null]"#).unwrap_err(),
        SpecError::InvalidAttributes { found: "null" }
    );
    assert_eq!(
        Spec::from_json_str(r#"["div", {}, {"id": "x"}]"#).unwrap_err(),
        SpecError::InvalidChild { index: 2, found: "object" }
    );
    assert_eq!(
        Spec::from_json_str(r#"["div", {"style": {"a": {"b": "c"}}}]"#).unwrap_err(),
        SpecError::UnsupportedNesting { key: "style".into(), sub_key: "a".into() }
    );
}

#[test]
fn numeric_second_slot_means_no_attributes() {
    let host = MemoryHost::new();
    let p = make_elem(&host, &Spec::from_json_str(r#"["p", 7, "seven"]"#).unwrap()).unwrap();

    assert!(p.attributes().is_empty());
    assert_eq!(p.to_html(), "<p>seven</p>");
}
