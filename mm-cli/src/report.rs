//! Plain-text rendering for the mm binary.
//!
//! Everything here is a pure string builder, so the exact shape of the
//! output can be pinned down in tests without running conversions.

use std::collections::BTreeSet;
use std::fmt::Write;

use mm_convert::{ConversionStep, FormatGraph, ToolStatus};

/// The numbered step list shown for --dry-run.
pub fn render_steps(steps: &[ConversionStep], requirements: &BTreeSet<String>) -> String {
    let mut out = String::from("Planned steps:\n");
    if steps.is_empty() {
        out.push_str("  (none, the file is copied as-is)\n");
    }
    for (index, step) in steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", index + 1, step);
    }
    if !requirements.is_empty() {
        let tools: Vec<&str> = requirements.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Required tools: {}", tools.join(", "));
    }
    out
}

/// Missing-tool report with the install hint.
pub fn render_missing_tools(missing: &[String]) -> String {
    format!(
        "Missing required tools: {}\n\
         Install them or rerun with --ignore-deps to attempt the conversion anyway.\n",
        missing.join(", ")
    )
}

/// Every known format with its direct-conversion count.
pub fn render_formats(graph: &FormatGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Known formats ({}):", graph.len());
    for format in graph.formats() {
        let count = graph.node(format).map(|node| node.edges().len()).unwrap_or(0);
        let noun = if count == 1 { "conversion" } else { "conversions" };
        let _ = writeln!(out, "  {format}: {count} direct {noun}");
    }
    out
}

/// Probe results for the external tools.
pub fn render_probes(statuses: &[ToolStatus]) -> String {
    let mut out = String::from("External tools:\n");
    for status in statuses {
        let state = if status.available { "available" } else { "missing" };
        let _ = writeln!(
            out,
            "  {:<8} {} ({})",
            status.tool,
            state,
            status.binary.display()
        );
    }
    out
}
