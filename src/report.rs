//! Report model: turn match records into serializable rows.
//!
//! Each row carries the output modes of the spec node that produced it, and
//! the node's `process` mode decides what value (if any) the row surfaces.

use crate::matcher::{MatchKind, MatchReport};
use crate::spec::{Process, Spec};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub ix: usize,
    pub kind: &'static str,
    pub spec_name: Option<String>,
    pub elem_name: Option<String>,
    pub stack: &'static str,
    pub process: &'static str,
    /// Absent for `process: none` nodes.
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub records: usize,
    pub values: usize,
    pub ordinals: usize,
    pub mismatches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub spec: String,
    pub records: Vec<MatchView>,
    pub mismatches: Vec<String>,
    pub totals: TotalsView,
}

pub fn build_report_data(spec: &Spec, report: &MatchReport<'_, '_, Value>) -> ReportData {
    let mut values = 0usize;
    let mut ordinals = 0usize;

    let records: Vec<MatchView> = report
        .matches
        .iter()
        .map(|m| {
            let value = match m.kind {
                MatchKind::Ordinal => {
                    ordinals += 1;
                    Some(Value::from(m.ix))
                }
                MatchKind::Value => {
                    values += 1;
                    surface(m.spec.process, m.obj)
                }
            };
            MatchView {
                ix: m.ix,
                kind: m.kind.as_str(),
                spec_name: m.spec_name.map(str::to_string),
                elem_name: m.elem_name.map(str::to_string),
                stack: m.spec.stack.as_str(),
                process: m.spec.process.as_str(),
                value,
            }
        })
        .collect();

    let mismatches: Vec<String> = report.mismatches.iter().map(|e| e.to_string()).collect();

    ReportData {
        spec: spec.to_string(),
        totals: TotalsView {
            records: records.len(),
            values,
            ordinals,
            mismatches: mismatches.len(),
        },
        records,
        mismatches,
    }
}

fn surface(process: Process, obj: &Value) -> Option<Value> {
    match process {
        Process::Asis => Some(obj.clone()),
        Process::Paste => Some(Value::String(paste(obj))),
        Process::None => None,
    }
}

/// Collapse a value into one string: scalars print plainly, containers join
/// their pasted elements with ",".
pub fn paste(obj: &Value) -> String {
    match obj {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => obj.to_string(),
        Value::Array(items) => items.iter().map(paste).collect::<Vec<_>>().join(","),
        Value::Object(map) => map.values().map(paste).collect::<Vec<_>>().join(","),
    }
}
