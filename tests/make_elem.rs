use sample_elem::domain::errors::DomError;
use sample_elem::infrastructure::{MemoryEvent, MemoryHost};
use sample_elem::{Attributes, ElemSpec, ElementSpec, elem, make_elem};

type Spec = ElemSpec<MemoryEvent>;

#[test]
fn builds_list_without_root_attributes() {
    let host = MemoryHost::new();
    let spec: Spec = elem!(["ul", ["li", "apple"], ["li", "banana"]]);
    let ul = make_elem(&host, &spec).unwrap();

    assert_eq!(ul.tag().as_deref(), Some("ul"));
    assert!(ul.attributes().is_empty());
    let items = ul.children();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].tag().as_deref(), Some("li"));
    assert_eq!(items[0].text_content(), "apple");
    assert_eq!(items[1].text_content(), "banana");
    assert_eq!(host.nodes_created(), spec.node_count());
    insta::assert_snapshot!(ul.to_html(), @"<ul><li>apple</li><li>banana</li></ul>");
}

#[test]
fn heading_merges_style_and_sets_text() {
    let host = MemoryHost::new();
    let spec: Spec = elem!(["h1", { "style": { "color": "red" }, "textContent": "Title" }]);
    let h1 = make_elem(&host, &spec).unwrap();

    assert_eq!(h1.text_content(), "Title");
    assert_eq!(h1.sub_property("style", "color").as_deref(), Some("red"));
    insta::assert_snapshot!(h1.to_html(), @r#"<h1 style="color: red;">Title</h1>"#);
}

#[test]
fn text_spec_builds_text_node() {
    let host = MemoryHost::new();
    let node = make_elem(&host, &Spec::text("plain")).unwrap();

    assert!(node.is_text());
    assert_eq!(node.text_content(), "plain");
}

#[test]
fn sequence_in_second_slot_is_a_child() {
    let host = MemoryHost::new();
    let spec: Spec = elem!(["div", ["span", "x"]]);
    let div = make_elem(&host, &spec).unwrap();

    assert!(div.attributes().is_empty());
    assert_eq!(div.child_count(), 1);
    assert_eq!(div.children()[0].tag().as_deref(), Some("span"));
}

#[test]
fn string_in_second_slot_is_a_child() {
    let host = MemoryHost::new();
    let spec: Spec = elem!(["p", "one", ["b", "two"], "three"]);
    let p = make_elem(&host, &spec).unwrap();

    assert_eq!(p.child_count(), 3);
    insta::assert_snapshot!(p.to_html(), @"<p>one<b>two</b>three</p>");
}

#[test]
fn nested_tree_keeps_document_order() {
    let host = MemoryHost::new();
    let spec: Spec = elem!([
        "div",
        { "id": "root" },
        ["p", "one"],
        "two",
        ["p", ["span", "three"]]
    ]);
    let root = make_elem(&host, &spec).unwrap();

    assert_eq!(root.attribute("id").as_deref(), Some("root"));
    insta::assert_snapshot!(
        root.to_html(),
        @r#"<div id="root"><p>one</p>two<p><span>three</span></p></div>"#
    );
    insta::assert_json_snapshot!(root.to_jsonml(), @r#"
    [
      "div",
      {
        "id": "root"
      },
      [
        "p",
        "one"
      ],
      "two",
      [
        "p",
        [
          "span",
          "three"
        ]
      ]
    ]
    "#);
}

#[test]
fn builder_api_matches_macro() {
    let host = MemoryHost::new();
    let built = ElementSpec::new("a")
        .with_attrs(Attributes::new().with("href", "/samples").with("class", "nav"))
        .child("Samples");
    let from_builder = make_elem(&host, &built.into()).unwrap();
    let from_macro = make_elem(&host, &elem!(["a", { "href": "/samples", "class": "nav" }, "Samples"])).unwrap();

    assert_eq!(from_builder, from_macro);
    assert!(!from_builder.ptr_eq(&from_macro));
}

#[test]
fn repeated_builds_are_equal_but_independent() {
    let host = MemoryHost::new();
    let spec: Spec = elem!(["ul", { "className": "list" }, ["li", "a"], ["li", "b"]]);
    let first = make_elem(&host, &spec).unwrap();
    let second = make_elem(&host, &spec).unwrap();

    assert_eq!(first, second);
    assert!(!first.ptr_eq(&second));
    for (a, b) in first.children().iter().zip(second.children()) {
        assert!(!a.ptr_eq(&b));
    }

    use sample_elem::UiHost;
    host.set_attribute(&first, "data-touched", "1").unwrap();
    assert_ne!(first, second);
    assert_eq!(second.attribute("data-touched"), None);
}

#[test]
fn error_deep_in_tree_propagates_unchanged() {
    let host = MemoryHost::new();
    let spec: Spec = elem!(["div", ["p", ["1bad"]]]);
    let err = make_elem(&host, &spec).unwrap_err();

    assert_eq!(err, DomError::InvalidCharacter { name: "1bad".into() });
}

#[test]
fn dataset_merge_writes_data_attributes() {
    let host = MemoryHost::new();
    let spec: Spec = elem!(["canvas", { "dataset": { "sampleName": "cube" }, "width": "300" }]);
    let canvas = make_elem(&host, &spec).unwrap();

    assert_eq!(canvas.attribute("data-sample-name").as_deref(), Some("cube"));
    assert_eq!(canvas.attribute("width").as_deref(), Some("300"));
}
