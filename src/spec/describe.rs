//! Spec descriptions (spec.json) and their translation into [`Spec`] trees.
//!
//! JSON shape:
//! {
//!   "type": "list",              // optional; "NIL" is the absent spec
//!   "as": "alias",               // optional output alias ("name" also accepted)
//!   "stack": "stack",            // stack | spread | auto
//!   "process": "asis",           // asis | paste | none
//!   "include": [0, "x"],         // integers are positions, strings are names
//!   "exclude": ["z"],
//!   "ix_name": "pos",
//!   "children": [ {...} ],
//!   "groups": [ ["g", [ {...}, {...} ]] ]
//! }
//!
//! Translation validates keywords, filter entries and group shapes, then
//! finalizes the tree so it is ready for matching.

use crate::spec::{Process, Spec, SpecGroup, Stack, TypeTag};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const SPEC_KEYS: &[&str] = &[
    "type", "as", "name", "stack", "process", "include", "exclude", "ix_name", "children",
    "groups",
];

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("malformed spec description: {0}")]
    Malformed(String),

    #[error("unknown stack keyword '{0}' (expected stack, spread or auto)")]
    UnknownStack(String),

    #[error("unknown process keyword '{0}' (expected asis, paste or none)")]
    UnknownProcess(String),

    #[error("group declaration must have 2 elements [alias, specs], found {0}")]
    GroupArity(usize),

    #[error("group declaration must be a list [alias, specs], found {0}")]
    GroupShape(String),

    #[error("group alias must be a string, found {0}")]
    GroupAlias(String),

    #[error("members of group '{0}' must be a list of specs")]
    GroupMembers(String),

    #[error("{axis} entry {entry} is neither a non-negative position nor a name")]
    FilterEntry { axis: &'static str, entry: String },

    #[error("NIL spec cannot declare {0}")]
    NilWithContent(&'static str),

    #[error("at {path}: {source}")]
    At {
        path: String,
        #[source]
        source: Box<SpecError>,
    },
}

impl SpecError {
    fn at(self, path: &str) -> Self {
        if path.is_empty() {
            return self;
        }
        match self {
            // Keep the innermost location only.
            err @ SpecError::At { .. } => err,
            err => SpecError::At {
                path: path.to_string(),
                source: Box::new(err),
            },
        }
    }
}

/// Raw node shape as it appears in spec.json.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSpec {
    #[serde(default, rename = "type")]
    pub ty: Option<String>,

    #[serde(default, rename = "as", alias = "name")]
    pub alias: Option<String>,

    #[serde(default)]
    pub stack: Option<String>,

    #[serde(default)]
    pub process: Option<String>,

    // Entries are checked in `build` so that bad ones get a precise error.
    #[serde(default)]
    pub include: Vec<Value>,

    #[serde(default)]
    pub exclude: Vec<Value>,

    #[serde(default)]
    pub ix_name: Option<String>,

    #[serde(default)]
    pub children: Vec<Value>,

    #[serde(default)]
    pub groups: Vec<Value>,
}

/// One include/exclude entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKey {
    Ix(usize),
    Name(String),
}

impl FilterKey {
    fn from_json(axis: &'static str, entry: &Value) -> Result<Self, SpecError> {
        match entry {
            Value::String(name) => Ok(FilterKey::Name(name.clone())),
            Value::Number(n) => n
                .as_u64()
                .and_then(|ix| usize::try_from(ix).ok())
                .map(FilterKey::Ix)
                .ok_or_else(|| SpecError::FilterEntry {
                    axis,
                    entry: entry.to_string(),
                }),
            _ => Err(SpecError::FilterEntry {
                axis,
                entry: entry.to_string(),
            }),
        }
    }
}

/// Shallow check: a JSON object whose keys are all spec fields.
pub fn is_spec(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.keys().all(|k| SPEC_KEYS.contains(&k.as_str())))
}

pub fn parse_stack(keyword: &str) -> Result<Stack, SpecError> {
    match keyword.trim().to_ascii_lowercase().as_str() {
        "stack" => Ok(Stack::Stack),
        "spread" => Ok(Stack::Spread),
        "auto" => Ok(Stack::Auto),
        _ => Err(SpecError::UnknownStack(keyword.to_string())),
    }
}

pub fn parse_process(keyword: &str) -> Result<Process, SpecError> {
    match keyword.trim().to_ascii_lowercase().as_str() {
        "asis" => Ok(Process::Asis),
        "paste" => Ok(Process::Paste),
        "none" => Ok(Process::None),
        _ => Err(SpecError::UnknownProcess(keyword.to_string())),
    }
}

/// Translate a description into a finalized spec tree.
pub fn spec_from_json(value: &Value) -> Result<Spec, SpecError> {
    let mut spec = build_spec(value, "")?;
    spec.finalize();
    Ok(spec)
}

/// Translate one group's members into a finalized [`SpecGroup`].
pub fn spec_group(alias: &str, members: &Value) -> Result<SpecGroup, SpecError> {
    let mut group = build_group_members(alias, members, "")?;
    for member in &mut group.specs {
        member.finalize();
    }
    Ok(group)
}

fn build_spec(value: &Value, path: &str) -> Result<Spec, SpecError> {
    let raw = RawSpec::deserialize(value)
        .map_err(|e| SpecError::Malformed(e.to_string()).at(path))?;
    raw.build(path)
}

impl RawSpec {
    /// Validate this node and its subtree. The result is not finalized.
    pub fn build(&self, path: &str) -> Result<Spec, SpecError> {
        let mut spec = Spec::new(self.ty.as_deref().map(str::trim).unwrap_or(""));

        if spec.ty == TypeTag::Nil {
            if !self.children.is_empty() {
                return Err(SpecError::NilWithContent("children").at(path));
            }
            if !self.groups.is_empty() {
                return Err(SpecError::NilWithContent("groups").at(path));
            }
            if !self.include.is_empty() || !self.exclude.is_empty() {
                return Err(SpecError::NilWithContent("filters").at(path));
            }
        }

        spec.alias = self.alias.clone();
        spec.ix_name = self.ix_name.clone();

        if let Some(kw) = &self.stack {
            spec.stack = parse_stack(kw).map_err(|e| e.at(path))?;
        }
        if let Some(kw) = &self.process {
            spec.process = parse_process(kw).map_err(|e| e.at(path))?;
        }

        for entry in &self.include {
            match FilterKey::from_json("include", entry).map_err(|e| e.at(path))? {
                FilterKey::Ix(ix) => spec.include_ixes.insert(ix),
                FilterKey::Name(name) => spec.include_names.insert(name),
            };
        }
        for entry in &self.exclude {
            match FilterKey::from_json("exclude", entry).map_err(|e| e.at(path))? {
                FilterKey::Ix(ix) => spec.exclude_ixes.insert(ix),
                FilterKey::Name(name) => spec.exclude_names.insert(name),
            };
        }

        for (i, child) in self.children.iter().enumerate() {
            let child_path = join_path(path, &format!("children[{}]", i));
            spec.children.push(build_spec(child, &child_path)?);
        }

        for (i, decl) in self.groups.iter().enumerate() {
            let group_path = join_path(path, &format!("groups[{}]", i));
            spec.groups.push(build_group(decl, &group_path)?);
        }

        Ok(spec)
    }
}

fn build_group(decl: &Value, path: &str) -> Result<SpecGroup, SpecError> {
    let parts = decl
        .as_array()
        .ok_or_else(|| SpecError::GroupShape(decl.to_string()).at(path))?;
    if parts.len() != 2 {
        return Err(SpecError::GroupArity(parts.len()).at(path));
    }
    let alias = parts[0]
        .as_str()
        .ok_or_else(|| SpecError::GroupAlias(parts[0].to_string()).at(path))?;
    build_group_members(alias, &parts[1], path)
}

fn build_group_members(alias: &str, members: &Value, path: &str) -> Result<SpecGroup, SpecError> {
    let list = members
        .as_array()
        .ok_or_else(|| SpecError::GroupMembers(alias.to_string()).at(path))?;

    let mut specs = Vec::with_capacity(list.len());
    for (i, member) in list.iter().enumerate() {
        let member_path = join_path(path, &format!("{}[{}]", alias, i));
        specs.push(build_spec(member, &member_path)?);
    }

    Ok(SpecGroup {
        alias: alias.to_string(),
        specs,
    })
}

fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}
