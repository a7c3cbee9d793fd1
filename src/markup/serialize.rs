//! Runs → markup.

use super::escape::escape_text;
use crate::model::{Inline, Mark, Run};

/// Serialize an inline sequence to markup.
///
/// Each run is wrapped in its mark tags in canonical order, bold outermost,
/// so equal mark sets always produce equal markup. Titles are wrapped in
/// `<strong><u>` around their own runs.
pub fn serialize_runs(items: &[Inline]) -> String {
    let mut out = String::new();
    for item in items {
        match item {
            Inline::Text(run) => write_run(&mut out, run),
            Inline::Title(runs) => {
                out.push_str("<strong><u>");
                for run in runs {
                    write_run(&mut out, run);
                }
                out.push_str("</u></strong>");
            }
        }
    }
    out
}

/// Serialize plain runs (no titles).
pub fn serialize_text(runs: &[Run]) -> String {
    let mut out = String::new();
    for run in runs {
        write_run(&mut out, run);
    }
    out
}

fn write_run(out: &mut String, run: &Run) {
    if run.text.is_empty() {
        return;
    }
    let marks: Vec<Mark> = run.marks.iter().collect();
    for mark in &marks {
        out.push('<');
        out.push_str(mark.tag());
        out.push('>');
    }
    out.push_str(&escape_text(&run.text));
    for mark in marks.iter().rev() {
        out.push_str("</");
        out.push_str(mark.tag());
        out.push('>');
    }
}
