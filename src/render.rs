use crate::Result;
use crate::report::ReportData;
use crate::spec::Spec;
use std::fmt::Write;

/// Render the report as pretty JSON.
pub fn render_json_report(data: &ReportData) -> Result<String> {
    let mut json = serde_json::to_string_pretty(data)?;
    json.push('\n');
    Ok(json)
}

/// One line per record, then one per skipped branch.
pub fn render_text_report(data: &ReportData) -> String {
    let mut out = String::new();
    for r in &data.records {
        let value = r
            .value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{:<8} ix:{:<4} spec_name:{:<12} elem_name:{:<12} {}",
            r.kind,
            r.ix,
            r.spec_name.as_deref().unwrap_or("NULL"),
            r.elem_name.as_deref().unwrap_or("NULL"),
            value
        );
    }
    for m in &data.mismatches {
        let _ = writeln!(out, "skipped  {}", m);
    }
    let _ = writeln!(
        out,
        "{} records ({} values, {} ordinals), {} skipped branches",
        data.totals.records, data.totals.values, data.totals.ordinals, data.totals.mismatches
    );
    out
}

/// Indented dump of a spec tree, one node per line.
pub fn render_spec_tree(spec: &Spec) -> String {
    fn walk(spec: &Spec, depth: usize, out: &mut String) {
        let pad = "  ".repeat(depth);
        let _ = write!(out, "{}{}", pad, spec);
        if let Some(alias) = &spec.alias {
            let _ = write!(out, " as {}", alias);
        }
        if let Some(ix_name) = &spec.ix_name {
            let _ = write!(out, " ix_name {}", ix_name);
        }
        out.push('\n');

        for child in &spec.children {
            walk(child, depth + 1, out);
        }
        for group in &spec.groups {
            let _ = writeln!(out, "{}  group {}:", pad, group.alias);
            for member in &group.specs {
                walk(member, depth + 2, out);
            }
        }
    }

    let mut out = String::new();
    walk(spec, 0, &mut out);
    out
}
