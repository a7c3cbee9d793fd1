//! Lenient markup → runs.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::escape::{escape_stray, resolve_entity};
use crate::model::{Mark, MarkSet, Run, normalize_runs};
use crate::record::RichText;

/// Decode rich text into a normalized run sequence.
///
/// Run sequences pass through (normalized); markup is parsed with
/// [`parse_html`].
pub fn parse_markup(text: &RichText) -> Vec<Run> {
    match text {
        RichText::Runs(runs) => normalize_runs(runs.clone()),
        RichText::Markup(html) => parse_html(html),
    }
}

/// Parse an HTML-ish fragment into runs.
///
/// Formatting elements contribute marks to everything inside them; any other
/// element is unwrapped. Mismatched and unclosed tags are tolerated, and a
/// `<` or `&` that cannot start markup is read as text. Never fails: if the
/// reader gives up, the rest of the input is kept as text.
pub fn parse_html(html: &str) -> Vec<Run> {
    if !html.contains(['<', '&']) {
        return normalize_runs(vec![Run::plain(html)]);
    }

    let html = escape_stray(html);
    let mut reader = Reader::from_str(&html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    // Open elements with the marks in effect inside each
    let mut stack: Vec<(Vec<u8>, MarkSet)> = Vec::new();
    let mut runs = Vec::new();

    loop {
        let current = stack.last().map(|(_, m)| *m).unwrap_or(MarkSet::EMPTY);
        let last_pos = reader.buffer_position() as usize;

        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_ascii_lowercase();
                match name.as_slice() {
                    b"br" => runs.push(Run::marked(" ", current)),
                    n if is_void(n) => {}
                    _ => {
                        let marks = element_marks(&e, &name, current);
                        stack.push((name, marks));
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref().eq_ignore_ascii_case(b"br") {
                    runs.push(Run::marked(" ", current));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name().as_ref().to_ascii_lowercase();
                if let Some(pos) = stack.iter().rposition(|(open, _)| *open == name) {
                    stack.truncate(pos);
                }
            }
            Ok(Event::Text(e)) => {
                runs.push(Run::marked(String::from_utf8_lossy(e.as_ref()), current));
            }
            Ok(Event::CData(e)) => {
                runs.push(Run::marked(String::from_utf8_lossy(e.as_ref()), current));
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                let text = match resolve_entity(&entity) {
                    Some(c) => c.to_string(),
                    None => format!("&{entity};"),
                };
                runs.push(Run::marked(text, current));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, offset = last_pos, "malformed markup, keeping remainder as text");
                if let Some(rest) = html.get(last_pos..) {
                    runs.push(Run::marked(rest, current));
                }
                break;
            }
        }
    }

    normalize_runs(runs)
}

fn is_void(name: &[u8]) -> bool {
    matches!(
        name,
        b"hr" | b"img" | b"input" | b"meta" | b"link" | b"wbr" | b"col" | b"area" | b"source"
    )
}

/// Marks in effect inside an element opened while `inherited` applied.
fn element_marks(e: &BytesStart<'_>, name: &[u8], inherited: MarkSet) -> MarkSet {
    let mut marks = inherited;
    match name {
        b"b" | b"strong" => marks.insert(Mark::Bold),
        b"i" | b"em" => marks.insert(Mark::Italic),
        b"u" => marks.insert(Mark::Underline),
        b"mark" => marks.insert(Mark::Highlight),
        _ => {}
    }

    let underlined = e.html_attributes().flatten().any(|attr| {
        attr.key.as_ref().eq_ignore_ascii_case(b"style")
            && style_underlines(&String::from_utf8_lossy(&attr.value))
    });
    if underlined {
        marks.insert(Mark::Underline);
    }
    marks
}

/// Whether an inline `style` declares an underline decoration.
fn style_underlines(style: &str) -> bool {
    style.split(';').any(|decl| {
        decl.split_once(':').is_some_and(|(prop, value)| {
            prop.trim().to_ascii_lowercase().starts_with("text-decoration")
                && value.to_ascii_lowercase().contains("underline")
        })
    })
}
