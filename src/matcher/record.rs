use crate::spec::Spec;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// A selected leaf element.
    Value,
    /// Position of a selected element, exposed under the node's `ix_name`.
    Ordinal,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Value => "value",
            MatchKind::Ordinal => "ordinal",
        }
    }
}

/// One flattened match. Borrows both the spec and the matched value, so it
/// cannot outlive either.
#[derive(Debug, PartialEq)]
pub struct SpecMatch<'s, 'v, V: ?Sized> {
    /// Position of the element in its parent container.
    pub ix: usize,
    /// Output alias: the node's own alias, else the enclosing group's.
    pub spec_name: Option<&'s str>,
    /// Name the element carried in the source.
    pub elem_name: Option<&'v str>,
    pub obj: &'v V,
    pub kind: MatchKind,
    /// Node that produced the record; consumers read stack/process here.
    pub spec: &'s Spec,
}

impl<V: ?Sized> Clone for SpecMatch<'_, '_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: ?Sized> Copy for SpecMatch<'_, '_, V> {}

impl<V: ?Sized> fmt::Display for SpecMatch<'_, '_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "match[ix:{} spec_name:{} elem_name:{}]",
            self.ix,
            self.spec_name.unwrap_or("NULL"),
            self.elem_name.unwrap_or("NULL")
        )
    }
}
