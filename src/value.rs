//! Value model the matcher walks.
//!
//! Anything that can enumerate its elements in order (each with a position
//! and an optional name) and hand out references to them can be matched.

use serde_json::Value;

/// One element of a container, borrowed from it.
#[derive(Debug)]
pub struct Element<'a, V: ?Sized> {
    pub ix: usize,
    pub name: Option<&'a str>,
    pub value: &'a V,
}

impl<V: ?Sized> Clone for Element<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: ?Sized> Copy for Element<'_, V> {}

pub trait Nested {
    /// Elements in source order, or `None` when `self` is a scalar.
    fn elements(&self) -> Option<Vec<Element<'_, Self>>>;

    /// Short label used in mismatch diagnostics.
    fn kind(&self) -> &'static str;
}

/// Arrays are positional containers, objects are named containers in
/// document order, everything else is a scalar.
impl Nested for Value {
    fn elements(&self) -> Option<Vec<Element<'_, Self>>> {
        match self {
            Value::Array(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(ix, value)| Element {
                        ix,
                        name: None,
                        value,
                    })
                    .collect(),
            ),
            Value::Object(map) => Some(
                map.iter()
                    .enumerate()
                    .map(|(ix, (name, value))| Element {
                        ix,
                        name: Some(name.as_str()),
                        value,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}
