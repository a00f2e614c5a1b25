//! Matching a finalized spec tree against a nested value.
//!
//! The root spec describes the input value itself. Every node below it
//! selects among the elements of the container its parent hands it:
//! - eligibility: all elements on a terminal node, else the node's filters
//! - leaf nodes emit one record per selected element
//! - inner nodes descend into each selected element; children then groups
//!   select among its elements, in declaration order
//!
//! Output order is a pre-order flattening: source order of elements at each
//! level, then child order, then group order.

mod error;
mod record;

pub use error::MatchError;
pub use record::{MatchKind, SpecMatch};

use crate::diagnostics;
use crate::spec::Spec;
use crate::value::{Element, Nested};

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// Abort on the first structural mismatch instead of skipping the branch.
    pub strict: bool,
}

/// Records of one match run plus the branches that were skipped.
#[derive(Debug)]
pub struct MatchReport<'s, 'v, V: ?Sized> {
    pub matches: Vec<SpecMatch<'s, 'v, V>>,
    pub mismatches: Vec<MatchError>,
}

impl<'s, 'v, V: ?Sized> MatchReport<'s, 'v, V> {
    pub fn is_complete(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// The records if no branch was skipped, else the first mismatch.
    pub fn into_result(self) -> Result<Vec<SpecMatch<'s, 'v, V>>, MatchError> {
        match self.mismatches.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.matches),
        }
    }
}

/// Match strictly: any structural mismatch fails the whole call.
pub fn match_spec<'s, 'v, V>(
    spec: &'s Spec,
    value: &'v V,
) -> Result<Vec<SpecMatch<'s, 'v, V>>, MatchError>
where
    V: Nested + ?Sized,
{
    match_with(spec, value, MatchOptions { strict: true }).map(|report| report.matches)
}

/// Match, skipping branches that hit a structural mismatch. Records from
/// sibling branches are kept.
pub fn match_partial<'s, 'v, V>(spec: &'s Spec, value: &'v V) -> MatchReport<'s, 'v, V>
where
    V: Nested + ?Sized,
{
    let mut walker = Walker::new(false);
    // Non-strict walks record mismatches instead of returning them.
    let _ = walker.root(spec, value);
    walker.into_report()
}

pub fn match_with<'s, 'v, V>(
    spec: &'s Spec,
    value: &'v V,
    opts: MatchOptions,
) -> Result<MatchReport<'s, 'v, V>, MatchError>
where
    V: Nested + ?Sized,
{
    let mut walker = Walker::new(opts.strict);
    walker.root(spec, value)?;
    Ok(walker.into_report())
}

struct Walker<'s, 'v, V: ?Sized> {
    strict: bool,
    out: Vec<SpecMatch<'s, 'v, V>>,
    mismatches: Vec<MatchError>,
    // Elements entered so far, for diagnostics.
    path: Vec<(usize, Option<&'v str>)>,
}

impl<'s, 'v, V> Walker<'s, 'v, V>
where
    V: Nested + ?Sized,
{
    fn new(strict: bool) -> Self {
        Self {
            strict,
            out: Vec::new(),
            mismatches: Vec::new(),
            path: Vec::new(),
        }
    }

    fn into_report(self) -> MatchReport<'s, 'v, V> {
        MatchReport {
            matches: self.out,
            mismatches: self.mismatches,
        }
    }

    fn root(&mut self, spec: &'s Spec, value: &'v V) -> Result<(), MatchError> {
        if spec.is_nil() {
            return Ok(());
        }
        let Some(elems) = value.elements() else {
            return self.mismatch(spec, value);
        };

        if spec.is_leaf() {
            return self.select(spec, &elems, None);
        }

        // The root's own filters decide which input elements its children see.
        let visible = eligible(spec, &elems);
        for elem in &visible {
            self.push_ordinal(spec, elem);
        }
        self.descend(spec, &visible, spec.alias.as_deref())
    }

    /// `spec` selects among `elems`. `inherited` is the innermost inherited alias
    /// (an enclosing group's or an aliased ancestor's), applied to records
    /// whose node has no alias.
    fn select(
        &mut self,
        spec: &'s Spec,
        elems: &[Element<'v, V>],
        inherited: Option<&'s str>,
    ) -> Result<(), MatchError> {
        if spec.is_nil() {
            return Ok(());
        }

        let selected = eligible(spec, elems);
        tracing::debug!(
            spec = %spec,
            selected = selected.len(),
            available = elems.len(),
            "selected elements"
        );

        for elem in selected {
            if spec.is_leaf() {
                self.push_ordinal(spec, &elem);
                self.out.push(SpecMatch {
                    ix: elem.ix,
                    spec_name: spec.alias.as_deref().or(inherited),
                    elem_name: elem.name,
                    obj: elem.value,
                    kind: MatchKind::Value,
                    spec,
                });
                continue;
            }

            self.path.push((elem.ix, elem.name));
            let res = match elem.value.elements() {
                Some(sub) => {
                    self.push_ordinal(spec, &elem);
                    // An explicit alias here outranks the enclosing group's.
                    self.descend(spec, &sub, spec.alias.as_deref().or(inherited))
                }
                // Nothing was emitted for this element yet, so the branch
                // leaves no trace.
                None => self.mismatch(spec, elem.value),
            };
            self.path.pop();
            res?;
        }

        Ok(())
    }

    fn push_ordinal(&mut self, spec: &'s Spec, elem: &Element<'v, V>) {
        if let Some(ix_name) = spec.ix_name.as_deref() {
            self.out.push(SpecMatch {
                ix: elem.ix,
                spec_name: Some(ix_name),
                elem_name: elem.name,
                obj: elem.value,
                kind: MatchKind::Ordinal,
                spec,
            });
        }
    }

    fn descend(
        &mut self,
        spec: &'s Spec,
        elems: &[Element<'v, V>],
        inherited: Option<&'s str>,
    ) -> Result<(), MatchError> {
        for child in &spec.children {
            self.select(child, elems, inherited)?;
        }
        for grp in &spec.groups {
            for member in &grp.specs {
                self.select(member, elems, Some(grp.alias.as_str()))?;
            }
        }
        Ok(())
    }

    fn mismatch(&mut self, spec: &Spec, found: &V) -> Result<(), MatchError> {
        let err = MatchError::StructuralMismatch {
            spec: spec.to_string(),
            path: self.path_string(),
            found: found.kind(),
        };
        if self.strict {
            return Err(err);
        }
        diagnostics::warn(format!("skipping branch: {}", err));
        self.mismatches.push(err);
        Ok(())
    }

    fn path_string(&self) -> String {
        let mut s = String::from("$");
        for (ix, name) in &self.path {
            match name {
                Some(name) => {
                    s.push('.');
                    s.push_str(name);
                }
                None => s.push_str(&format!("[{}]", ix)),
            }
        }
        s
    }
}

fn eligible<'v, V: ?Sized>(spec: &Spec, elems: &[Element<'v, V>]) -> Vec<Element<'v, V>> {
    debug_assert!(
        !spec.terminal || !spec.has_filters(),
        "stale terminal flag on {}; call finalize() after editing filters",
        spec
    );

    if spec.terminal {
        return elems.to_vec();
    }
    elems
        .iter()
        .filter(|e| spec.admits(e.ix, e.name))
        .copied()
        .collect()
}
