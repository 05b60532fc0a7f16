use serde::de::{Deserialize, Deserializer, Error as _};
use serde_json::{Map, Value};

use super::attributes::{AttrValue, Attributes, SubProps};
use super::spec::{ElemSpec, ElementSpec, SecondSlot};
use crate::domain::errors::{SpecError, SpecResult};

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Scalars are written as their string form, like DOM attribute coercion.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn second_slot(value: Option<&Value>) -> SecondSlot {
    match value {
        None => SecondSlot::Missing,
        Some(Value::String(_)) => SecondSlot::Text,
        Some(Value::Array(_)) => SecondSlot::Sequence,
        Some(_) => SecondSlot::Other,
    }
}

fn parse_sub_props(key: &str, map: &Map<String, Value>) -> SpecResult<SubProps> {
    let mut props = SubProps::new();
    for (sub_key, value) in map {
        match scalar_text(value) {
            Some(text) => props.set(sub_key.as_str(), text),
            None => {
                return Err(SpecError::UnsupportedNesting { key: key.to_string(), sub_key: sub_key.clone() });
            }
        }
    }
    Ok(props)
}

fn parse_attributes<Ev>(value: &Value) -> SpecResult<Attributes<Ev>> {
    let map = match value {
        Value::Object(map) => map,
        // A number or boolean in the attributes slot has no entries.
        Value::Number(_) | Value::Bool(_) => return Ok(Attributes::new()),
        other => return Err(SpecError::InvalidAttributes { found: type_name(other) }),
    };

    let mut attrs = Attributes::new();
    for (key, value) in map {
        let value: AttrValue<Ev> = match value {
            Value::Object(inner) => AttrValue::Nested(parse_sub_props(key, inner)?),
            other => match scalar_text(other) {
                Some(text) => AttrValue::Text(text),
                None => {
                    return Err(SpecError::InvalidAttributeValue { key: key.clone(), found: type_name(other) });
                }
            },
        };
        attrs.set(key.as_str(), value);
    }
    Ok(attrs)
}

fn parse_sequence<Ev>(items: &[Value]) -> SpecResult<ElemSpec<Ev>> {
    let tag = match items.first() {
        Some(Value::String(tag)) => tag,
        Some(other) => return Err(SpecError::InvalidTag { found: type_name(other) }),
        None => return Err(SpecError::EmptySequence),
    };

    let slot = second_slot(items.get(1));
    let mut element = ElementSpec::new(tag.as_str());
    if slot.holds_attributes() {
        element.attrs = Some(parse_attributes(&items[1])?);
    }

    for (index, item) in items.iter().enumerate().skip(slot.first_child_index()) {
        let child = match item {
            Value::String(text) => ElemSpec::Text(text.clone()),
            Value::Array(seq) => parse_sequence(seq)?,
            other => return Err(SpecError::InvalidChild { index, found: type_name(other) }),
        };
        element.children.push(child);
    }
    Ok(ElemSpec::Element(element))
}

impl<Ev> TryFrom<&Value> for ElemSpec<Ev> {
    type Error = SpecError;

    fn try_from(value: &Value) -> SpecResult<Self> {
        match value {
            Value::String(text) => Ok(ElemSpec::Text(text.clone())),
            Value::Array(items) => parse_sequence(items),
            other => Err(SpecError::InvalidChild { index: 0, found: type_name(other) }),
        }
    }
}

impl<Ev> ElemSpec<Ev> {
    /// Parse a JsonML-like document such as `["ul", ["li", "apple"]]`.
    pub fn from_json_str(json: &str) -> SpecResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        ElemSpec::try_from(&value)
    }
}

impl<'de, Ev> Deserialize<'de> for ElemSpec<Ev> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ElemSpec::try_from(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type Spec = ElemSpec<()>;

    fn element(spec: &Spec) -> &ElementSpec<()> {
        match spec {
            ElemSpec::Element(el) => el,
            ElemSpec::Text(t) => panic!("expected element, got text {:?}", t),
        }
    }

    #[test]
    fn object_in_second_slot_is_attributes() {
        let spec = Spec::try_from(&json!(["a", {"href": "https://gpuweb.github.io"}, "link"])).unwrap();
        let el = element(&spec);
        let attrs = el.attrs.as_ref().unwrap();
        assert!(matches!(attrs.get("href"), Some(AttrValue::Text(v)) if v == "https://gpuweb.github.io"));
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn sequence_in_second_slot_is_a_child() {
        let spec = Spec::try_from(&json!(["div", ["span", "x"]])).unwrap();
        let el = element(&spec);
        assert!(el.attrs.is_none());
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn number_in_second_slot_is_swallowed_as_empty_attributes() {
        let spec = Spec::try_from(&json!(["p", 5, "text"])).unwrap();
        let el = element(&spec);
        assert!(el.attrs.as_ref().unwrap().is_empty());
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn null_attributes_are_rejected() {
        let err = Spec::try_from(&json!(["p", null])).unwrap_err();
        assert_eq!(err, SpecError::InvalidAttributes { found: "null" });
    }

    #[test]
    fn misplaced_mapping_is_an_invalid_child() {
        let err = Spec::try_from(&json!(["p", {}, "a", {"id": "x"}])).unwrap_err();
        assert_eq!(err, SpecError::InvalidChild { index: 3, found: "object" });
    }

    #[test]
    fn tag_must_be_a_string() {
        assert_eq!(Spec::try_from(&json!([])).unwrap_err(), SpecError::EmptySequence);
        assert_eq!(Spec::try_from(&json!([1])).unwrap_err(), SpecError::InvalidTag { found: "number" });
    }

    #[test]
    fn nested_values_are_one_level_deep() {
        let spec = Spec::try_from(&json!(["div", {"style": {"width": 10, "color": "red"}}])).unwrap();
        let attrs = element(&spec).attrs.clone().unwrap();
        match attrs.get("style") {
            Some(AttrValue::Nested(props)) => {
                assert_eq!(props.get("width"), Some("10"));
                assert_eq!(props.get("color"), Some("red"));
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = Spec::try_from(&json!(["div", {"style": {"inner": {"a": "b"}}}])).unwrap_err();
        assert_eq!(err, SpecError::UnsupportedNesting { key: "style".into(), sub_key: "inner".into() });
    }

    #[test]
    fn malformed_json_reports_parser_error() {
        assert!(matches!(Spec::from_json_str("[\"ul\","), Err(SpecError::Json(_))));
    }

    #[test]
    fn deserializes_through_serde() {
        let spec: Spec = serde_json::from_str(r#"["ul", ["li", "apple"], ["li", "banana"]]"#).unwrap();
        assert_eq!(spec.node_count(), 5);
    }
}
