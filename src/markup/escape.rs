//! Text escaping for serialized markup.

use std::borrow::Cow;

/// Escape `&`, `<` and `>` in text content.
///
/// Quotes are left alone: serialized text never lands in an attribute.
///
/// ```
/// use vitae::markup::escape_text;
///
/// assert_eq!(escape_text("R&D <lead>"), "R&amp;D &lt;lead&gt;");
/// assert_eq!(escape_text("plain"), "plain");
/// ```
pub fn escape_text(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let Some(first) = memchr::memchr3(b'&', b'<', b'>', bytes) else {
        return Cow::Borrowed(s);
    };

    let mut result = String::with_capacity(s.len() + 8);
    result.push_str(&s[..first]);
    for c in s[first..].chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape each `<` and `&` that cannot open a tag or a reference.
///
/// Hand-typed résumé text is full of `M&A`, `R&D` and `x < y`; left alone,
/// a markup reader would swallow or reject them. A `<` opens a tag only when
/// followed by a letter, `/`, `!` or `?` and closed by `>` before the next
/// `<`. A `&` opens a reference only when followed by `name;` or `#digits;`.
pub(crate) fn escape_stray(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;

    for pos in memchr::memchr2_iter(b'<', b'&', bytes) {
        let rest = &bytes[pos + 1..];
        let (stray, escaped) = match bytes[pos] {
            b'<' => (!opens_tag(rest), "&lt;"),
            _ => (!opens_reference(rest), "&amp;"),
        };
        if stray {
            let buf = out.get_or_insert_with(|| String::with_capacity(s.len() + 8));
            buf.push_str(&s[copied..pos]);
            buf.push_str(escaped);
            copied = pos + 1;
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&s[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(s),
    }
}

fn opens_tag(rest: &[u8]) -> bool {
    let Some(&first) = rest.first() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || matches!(first, b'/' | b'!' | b'?')) {
        return false;
    }
    match (memchr::memchr(b'>', rest), memchr::memchr(b'<', rest)) {
        (Some(close), Some(next)) => close < next,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

fn opens_reference(rest: &[u8]) -> bool {
    let Some(end) = memchr::memchr(b';', rest) else {
        return false;
    };
    match &rest[..end] {
        [b'#', b'x' | b'X', hex @ ..] => !hex.is_empty() && hex.iter().all(u8::is_ascii_hexdigit),
        [b'#', dec @ ..] => !dec.is_empty() && dec.iter().all(u8::is_ascii_digit),
        [first, tail @ ..] => {
            first.is_ascii_alphabetic() && tail.iter().all(u8::is_ascii_alphanumeric)
        }
        [] => false,
    }
}

/// Resolve a named or numeric entity reference (without `&` and `;`).
pub(crate) fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
