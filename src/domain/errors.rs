use derive_more::Display;

/// Failures while turning a JSON or JS value into an `ElemSpec`.
///
/// These are raised before any host call is made; errors coming from the host
/// itself are never converted into this type.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SpecError {
    #[display(fmt = "Malformed spec JSON: {}", _0)]
    Json(String),
    #[display(fmt = "Element sequence is empty: index 0 must hold the tag")]
    EmptySequence,
    #[display(fmt = "Tag must be a string, found {}", found)]
    InvalidTag { found: &'static str },
    #[display(fmt = "Attributes must be a mapping, found {}", found)]
    InvalidAttributes { found: &'static str },
    #[display(fmt = "Attribute '{}' has unsupported value of type {}", key, found)]
    InvalidAttributeValue { key: String, found: &'static str },
    #[display(fmt = "Child at index {} must be a string or a sequence, found {}", index, found)]
    InvalidChild { index: usize, found: &'static str },
    #[display(fmt = "Attribute '{}.{}' nests deeper than one sub-object level", key, sub_key)]
    UnsupportedNesting { key: String, sub_key: String },
}

impl std::error::Error for SpecError {}

impl From<serde_json::Error> for SpecError {
    fn from(err: serde_json::Error) -> Self {
        SpecError::Json(err.to_string())
    }
}

/// Exceptions raised by the in-memory UI tree, named after their DOM counterparts.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DomError {
    /// `InvalidCharacterError`: tag or attribute name is not a valid XML name.
    #[display(fmt = "InvalidCharacterError: '{}' is not a valid name", name)]
    InvalidCharacter { name: String },
    /// `TypeError`: merging into a property that is not an object.
    #[display(fmt = "TypeError: property '{}' is not an object", property)]
    NotAnObject { property: String },
    /// `TypeError`: assignment to a getter-only property such as `dataset`.
    #[display(fmt = "TypeError: property '{}' is read-only", property)]
    ReadOnlyProperty { property: String },
    #[display(fmt = "TypeError: {} requires an element node", operation)]
    NotAnElement { operation: &'static str },
    #[display(fmt = "HierarchyRequestError: the new child contains the parent")]
    HierarchyRequest,
}

impl std::error::Error for DomError {}

pub type SpecResult<T> = Result<T, SpecError>;
pub type DomResult<T> = Result<T, DomError>;
