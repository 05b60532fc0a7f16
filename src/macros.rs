/// Write an `ElemSpec` in sequence form.
///
/// Index 0 is the tag. A `{ ... }` block right after the tag is the attributes
/// mapping; everything else is a child. Children are string expressions or
/// nested `[...]` sequences; wrap longer expressions in parentheses.
///
/// ```
/// use sample_elem::elem;
/// use sample_elem::domain::elem::ElemSpec;
///
/// let spec: ElemSpec<()> = elem!(["h1", { "style": { "color": "red" }, "textContent": "Title" }]);
/// let list: ElemSpec<()> = elem!(["ul", ["li", "apple"], ["li", "banana"]]);
/// assert_eq!(list.node_count(), 5);
/// # let _ = spec;
/// ```
#[macro_export]
macro_rules! elem {
    (@value { $($key:literal : $value:expr),* $(,)? }) => {
        $crate::domain::elem::AttrValue::Nested(
            $crate::domain::elem::SubProps::new() $(.with($key, $value))*
        )
    };
    (@value $value:expr) => {
        $crate::domain::elem::AttrValue::from($value)
    };
    ([$tag:expr, { $($key:literal : $value:tt),* $(,)? } $(, $child:tt)* $(,)?]) => {
        $crate::domain::elem::ElemSpec::from(
            $crate::domain::elem::ElementSpec::new($tag)
                .with_attrs($crate::domain::elem::Attributes::new() $(.with($key, $crate::elem!(@value $value)))*)
                $(.child($crate::elem!($child)))*
        )
    };
    ([$tag:expr $(, $child:tt)* $(,)?]) => {
        $crate::domain::elem::ElemSpec::from(
            $crate::domain::elem::ElementSpec::new($tag) $(.child($crate::elem!($child)))*
        )
    };
    ($text:expr) => {
        $crate::domain::elem::ElemSpec::from($text)
    };
}
