//! Spec layer: description schema + finalized in-memory spec trees.
//!
//! This module is intentionally separate from matching and rendering.
//! It owns:
//! - the Spec tree and its mode enums (model)
//! - translation from JSON descriptions (describe)

pub mod describe;
pub mod model;

pub use describe::{SpecError, is_spec, parse_process, parse_stack, spec_from_json, spec_group};
pub use model::{Process, Spec, SpecGroup, Stack, TypeTag};
