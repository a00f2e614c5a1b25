//! Spec tree: one node per matching rule.
//!
//! A node carries its output modes (`stack`, `process`), static filters, child
//! specs and named groups of child specs. `terminal` is derived and must be
//! refreshed with [`Spec::finalize`] once the tree is complete.

use std::collections::BTreeSet;
use std::fmt;

/// How matches of one node combine into output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stack {
    /// Successive rows.
    Stack,
    /// Parallel columns.
    Spread,
    /// Left to the consumer, based on the observed matches.
    #[default]
    Auto,
}

impl Stack {
    pub fn as_str(self) -> &'static str {
        match self {
            Stack::Stack => "STACK",
            Stack::Spread => "SPREAD",
            Stack::Auto => "AUTO",
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treatment of a matched leaf value before it reaches the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Process {
    Asis,
    Paste,
    /// Structural match only; no value is surfaced.
    #[default]
    None,
}

impl Process {
    pub fn as_str(self) -> &'static str {
        match self {
            Process::Asis => "ASIS",
            Process::Paste => "PASTE",
            Process::None => "NONE",
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of the value a node expects. `Nil` marks the absent spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeTag {
    Nil,
    #[default]
    Untyped,
    Named(String),
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Nil => "NIL",
            TypeTag::Untyped => "",
            TypeTag::Named(ty) => ty,
        }
    }
}

/// A named bundle of child specs whose matches share the group alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGroup {
    pub alias: String,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec {
    pub stack: Stack,
    pub process: Process,

    /// No filtering here and every child is terminal. Derived, see
    /// [`Spec::set_terminal`].
    pub terminal: bool,

    /// Output alias; overrides the source element's name downstream.
    pub alias: Option<String>,
    pub ty: TypeTag,

    pub include_ixes: BTreeSet<usize>,
    pub include_names: BTreeSet<String>,
    pub exclude_ixes: BTreeSet<usize>,
    pub exclude_names: BTreeSet<String>,

    pub children: Vec<Spec>,
    pub groups: Vec<SpecGroup>,

    /// Name under which the position of each selected element is exposed.
    pub ix_name: Option<String>,
}

impl Default for Spec {
    fn default() -> Self {
        Self {
            stack: Stack::default(),
            process: Process::default(),
            terminal: true,
            alias: None,
            ty: TypeTag::default(),
            include_ixes: BTreeSet::new(),
            include_names: BTreeSet::new(),
            exclude_ixes: BTreeSet::new(),
            exclude_names: BTreeSet::new(),
            children: Vec::new(),
            groups: Vec::new(),
            ix_name: None,
        }
    }
}

impl Spec {
    /// A fresh node with default modes (`AUTO`, `NONE`) and no filters.
    /// An empty `ty` leaves the node untyped; `"NIL"` (any case) gives
    /// [`Spec::nil`].
    pub fn new(ty: &str) -> Self {
        let ty = match ty.trim() {
            "" => TypeTag::Untyped,
            nil if nil.eq_ignore_ascii_case("nil") => TypeTag::Nil,
            _ => TypeTag::Named(ty.to_string()),
        };
        Self {
            ty,
            ..Self::default()
        }
    }

    /// The absent spec. Matches nothing.
    pub fn nil() -> Self {
        Self {
            ty: TypeTag::Nil,
            ..Self::default()
        }
    }

    pub fn is_nil(&self) -> bool {
        self.ty == TypeTag::Nil
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.groups.is_empty()
    }

    pub fn has_filters(&self) -> bool {
        !(self.include_ixes.is_empty()
            && self.include_names.is_empty()
            && self.exclude_ixes.is_empty()
            && self.exclude_names.is_empty())
    }

    /// Recompute `terminal` for this node only. Children must already carry
    /// correct flags. Group members are deliberately not consulted.
    pub fn set_terminal(&mut self) {
        self.terminal = !self.has_filters() && self.children.iter().all(|sp| sp.terminal);
    }

    /// Refresh terminality for the whole tree, children before parents.
    pub fn finalize(&mut self) {
        for child in &mut self.children {
            child.finalize();
        }
        for group in &mut self.groups {
            for member in &mut group.specs {
                member.finalize();
            }
        }
        self.set_terminal();
    }

    /// Filter test for the element at `ix` named `name`, ignoring the
    /// terminal shortcut. Include axes are unioned; exclusion wins.
    pub fn admits(&self, ix: usize, name: Option<&str>) -> bool {
        let unrestricted = self.include_ixes.is_empty() && self.include_names.is_empty();
        let included = unrestricted
            || self.include_ixes.contains(&ix)
            || name.is_some_and(|n| self.include_names.contains(n));

        included
            && !self.exclude_ixes.contains(&ix)
            && !name.is_some_and(|n| self.exclude_names.contains(n))
    }

    // Builders. They leave `terminal` stale; finish with `finalized()`.

    pub fn named(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn stack(mut self, stack: Stack) -> Self {
        self.stack = stack;
        self
    }

    pub fn process(mut self, process: Process) -> Self {
        self.process = process;
        self
    }

    pub fn include_ix(mut self, ix: usize) -> Self {
        self.include_ixes.insert(ix);
        self
    }

    pub fn include_name(mut self, name: impl Into<String>) -> Self {
        self.include_names.insert(name.into());
        self
    }

    pub fn exclude_ix(mut self, ix: usize) -> Self {
        self.exclude_ixes.insert(ix);
        self
    }

    pub fn exclude_name(mut self, name: impl Into<String>) -> Self {
        self.exclude_names.insert(name.into());
        self
    }

    pub fn ix_name(mut self, name: impl Into<String>) -> Self {
        self.ix_name = Some(name.into());
        self
    }

    pub fn child(mut self, child: Spec) -> Self {
        self.children.push(child);
        self
    }

    pub fn group(mut self, alias: impl Into<String>, specs: Vec<Spec>) -> Self {
        self.groups.push(SpecGroup {
            alias: alias.into(),
            specs,
        });
        self
    }

    pub fn finalized(mut self) -> Self {
        self.finalize();
        self
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut name = self.ty.as_str().to_string();
        for nm in &self.include_names {
            name.push_str(nm);
            name.push(',');
        }
        write!(
            f,
            "spec[{} stack:{} process:{} terminal[parent]:{}]",
            name,
            self.stack,
            self.process,
            if self.terminal { "T" } else { "F" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn terminal_flags(spec: &Spec) -> Vec<bool> {
        let mut out = vec![spec.terminal];
        for child in &spec.children {
            out.extend(terminal_flags(child));
        }
        for group in &spec.groups {
            for member in &group.specs {
                out.extend(terminal_flags(member));
            }
        }
        out
    }

    #[test]
    fn new_spec_has_defaults() {
        let sp = Spec::new("list");
        assert_eq!(sp.stack, Stack::Auto);
        assert_eq!(sp.process, Process::None);
        assert!(sp.terminal);
        assert_eq!(sp.ty, TypeTag::Named("list".into()));
        assert!(sp.is_leaf());
        assert!(!sp.has_filters());
        assert_eq!(Spec::new("").ty, TypeTag::Untyped);
    }

    #[test]
    fn nil_type_name_builds_the_nil_spec() {
        assert!(Spec::new("NIL").is_nil());
        assert!(Spec::new("nil").is_nil());
        assert_eq!(Spec::new("NIL"), Spec::nil());
        assert!(!Spec::new("nils").is_nil());
    }

    #[test]
    fn nil_is_distinct_from_empty_spec() {
        assert!(Spec::nil().is_nil());
        assert!(!Spec::new("").is_nil());
        assert_ne!(Spec::nil(), Spec::default());
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut sp = Spec::new("list")
            .child(Spec::new("").include_name("x"))
            .child(Spec::new("").child(Spec::new("")))
            .group("g", vec![Spec::new("").exclude_ix(1)]);
        sp.finalize();
        let first = terminal_flags(&sp);
        sp.finalize();
        assert_eq!(terminal_flags(&sp), first);
        assert_eq!(first, vec![false, false, true, true, false]);
    }

    #[test]
    fn unfiltered_tree_is_terminal() {
        let sp = Spec::new("list")
            .child(Spec::new("a").child(Spec::new("b")))
            .child(Spec::new("c"))
            .finalized();
        assert!(sp.terminal);
    }

    #[test]
    fn any_filter_in_child_subtree_clears_terminal() {
        let cases = [
            Spec::new("").include_ix(0),
            Spec::new("").include_name("x"),
            Spec::new("").exclude_ix(2),
            Spec::new("").exclude_name("z"),
        ];
        for leaf in cases {
            let sp = Spec::new("list")
                .child(Spec::new("").child(leaf.clone()))
                .finalized();
            assert!(!sp.terminal, "filter {leaf} should clear terminal");
            assert!(!sp.children[0].terminal);
        }
    }

    #[test]
    fn group_filters_do_not_affect_parent_terminality() {
        let sp = Spec::new("list")
            .group("g", vec![Spec::new("").include_name("x")])
            .finalized();
        assert!(sp.terminal);
        assert!(!sp.groups[0].specs[0].terminal);
    }

    #[test]
    fn stale_terminal_until_refreshed() {
        let mut sp = Spec::new("list").finalized();
        sp.include_names.insert("x".into());
        assert!(sp.terminal);
        sp.set_terminal();
        assert!(!sp.terminal);
    }

    #[test]
    fn admits_unions_include_axes() {
        let sp = Spec::new("").include_ix(0).include_name("b");
        assert!(sp.admits(0, Some("a")));
        assert!(sp.admits(1, Some("b")));
        assert!(!sp.admits(2, Some("c")));
        assert!(!sp.admits(2, None));
    }

    #[test]
    fn admits_applies_exclude_after_include() {
        let sp = Spec::new("").include_name("a").exclude_ix(0);
        assert!(!sp.admits(0, Some("a")));
        assert!(sp.admits(3, Some("a")));

        let open = Spec::new("").exclude_name("z");
        assert!(open.admits(5, None));
        assert!(!open.admits(5, Some("z")));
    }

    #[test]
    fn duplicate_filter_entries_are_harmless() {
        let sp = Spec::new("")
            .include_name("x")
            .include_name("x")
            .include_ix(1)
            .include_ix(1);
        assert_eq!(sp.include_names.len(), 1);
        assert_eq!(sp.include_ixes.len(), 1);
    }

    #[test]
    fn display_lists_modes_and_names() {
        let sp = Spec::new("list")
            .include_name("x")
            .include_name("y")
            .stack(Stack::Spread)
            .process(Process::Paste)
            .finalized();
        assert_eq!(
            sp.to_string(),
            "spec[listx,y, stack:SPREAD process:PASTE terminal[parent]:F]"
        );
        assert_eq!(
            Spec::nil().to_string(),
            "spec[NIL stack:AUTO process:NONE terminal[parent]:T]"
        );
    }
}
