//! Declarative matcher for nested, partially named containers.
//!
//! A [`Spec`] tree describes which elements of a nested value to select and
//! how to descend into them; [`match_spec`] walks a value and flattens the
//! selection into ordered [`SpecMatch`] records for an unnesting consumer.

pub mod diagnostics;
pub mod matcher;
pub mod render;
pub mod report;
pub mod spec;
pub mod value;

pub use matcher::{MatchError, MatchKind, MatchReport, SpecMatch, match_partial, match_spec};
pub use spec::{Process, Spec, SpecError, Stack, TypeTag};
pub use value::{Element, Nested};

pub type Result<T> = anyhow::Result<T>;
