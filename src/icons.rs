//! Contact glyphs.
//!
//! Each contact keyword maps to a small embedded SVG, handed out as a
//! `data:` URI so the presentation layer can use it without fetching
//! anything. Unknown keywords get a blank glyph.

use std::collections::HashMap;
use std::sync::OnceLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const EMAIL_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M2 5h20v14H2z" fill="none" stroke="currentColor" stroke-width="2"/><path d="M2 5l10 8 10-8" fill="none" stroke="currentColor" stroke-width="2"/></svg>"#;
const PHONE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M6 2h4l2 5-3 2a11 11 0 0 0 6 6l2-3 5 2v4a2 2 0 0 1-2 2A18 18 0 0 1 4 4a2 2 0 0 1 2-2z" fill="currentColor"/></svg>"#;
const LINKEDIN_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M4 9h4v11H4zM6 3a2 2 0 1 1 0 4 2 2 0 0 1 0-4zM10 9h4v2c.6-1.2 2-2.2 4-2.2 3 0 4 2 4 5.2v6h-4v-5.5c0-1.5-.5-2.5-1.8-2.5S14 13 14 14.5V20h-4z" fill="currentColor"/></svg>"#;
const WEBSITE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="10" fill="none" stroke="currentColor" stroke-width="2"/><path d="M2 12h20M12 2c3 3 3 17 0 20M12 2c-3 3-3 17 0 20" fill="none" stroke="currentColor" stroke-width="2"/></svg>"#;
const GITHUB_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M12 2a10 10 0 0 0-3.2 19.5c.5.1.7-.2.7-.5v-1.7c-2.8.6-3.4-1.3-3.4-1.3-.5-1.2-1.1-1.5-1.1-1.5-.9-.6.1-.6.1-.6 1 .1 1.5 1 1.5 1 .9 1.5 2.3 1.1 2.9.8.1-.6.3-1.1.6-1.3-2.2-.3-4.6-1.1-4.6-5 0-1.1.4-2 1-2.7-.1-.3-.4-1.3.1-2.7 0 0 .8-.3 2.7 1a9.4 9.4 0 0 1 5 0c1.9-1.3 2.7-1 2.7-1 .5 1.4.2 2.4.1 2.7.6.7 1 1.6 1 2.7 0 3.9-2.3 4.7-4.6 5 .4.3.7.9.7 1.9v2.8c0 .3.2.6.7.5A10 10 0 0 0 12 2z" fill="currentColor"/></svg>"#;

const BUILTIN: [(&str, &str); 5] = [
    ("email", EMAIL_SVG),
    ("phone", PHONE_SVG),
    ("linkedin", LINKEDIN_SVG),
    ("website", WEBSITE_SVG),
    ("github", GITHUB_SVG),
];

/// What to draw next to a contact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Glyph {
    /// A `data:image/svg+xml;base64,…` URI.
    Image(String),
    Blank,
}

/// Keyword → icon lookup.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    icons: HashMap<String, String>,
}

impl IconSet {
    /// An empty set: every lookup is blank.
    pub fn new() -> Self {
        Self::default()
    }

    /// The embedded icons for every contact keyword.
    pub fn builtin() -> &'static IconSet {
        static BUILTIN_SET: OnceLock<IconSet> = OnceLock::new();
        BUILTIN_SET.get_or_init(|| {
            let mut set = IconSet::new();
            for (kind, svg) in BUILTIN {
                set.insert_svg(kind, svg);
            }
            set
        })
    }

    /// Register an SVG document under a keyword.
    pub fn insert_svg(&mut self, kind: &str, svg: &str) {
        let uri = format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg));
        self.icons.insert(kind.to_string(), uri);
    }

    pub fn glyph(&self, kind: &str) -> Glyph {
        match self.icons.get(kind) {
            Some(uri) => Glyph::Image(uri.clone()),
            None => Glyph::Blank,
        }
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Link target for a contact value.
///
/// ```
/// use vitae::icons::contact_href;
///
/// assert_eq!(contact_href("email", "a@b.c").as_deref(), Some("mailto:a@b.c"));
/// assert_eq!(contact_href("phone", "+1 555").as_deref(), Some("tel:+1555"));
/// assert_eq!(contact_href("fax", "123"), None);
/// ```
pub fn contact_href(kind: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match kind {
        "email" => Some(format!("mailto:{value}")),
        "phone" => Some(format!(
            "tel:{}",
            value.chars().filter(|c| !c.is_whitespace()).collect::<String>()
        )),
        "linkedin" | "website" | "github" => {
            if value.contains("://") {
                Some(value.to_string())
            } else {
                Some(format!("https://{value}"))
            }
        }
        _ => None,
    }
}
