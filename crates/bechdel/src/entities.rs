//! HTML entity handling for provider titles.
//!
//! The provider returns titles HTML-escaped (`Ghostbusters &amp; Friends`).
//! Titles are decoded once when they arrive so display and comparison never
//! see the escaped form.

use std::borrow::Cow;

/// Longest entity body we try to resolve, e.g. `#x1F600` or `hellip`.
const MAX_ENTITY_LEN: usize = 10;

/// Decodes named, decimal and hex character references in a single pass.
///
/// Unknown names and malformed references are left verbatim, so a title that
/// merely contains `&` survives untouched.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        match resolve_reference(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn encode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Resolves the reference starting right after an `&`.
///
/// Returns the decoded character and how many bytes of `tail` it spans,
/// including the terminating `;`.
fn resolve_reference(tail: &str) -> Option<(char, usize)> {
    let semi = tail.bytes().take(MAX_ENTITY_LEN + 1).position(|b| b == b';')?;
    let body = &tail[..semi];

    let ch = if let Some(numeric) = body.strip_prefix('#') {
        decode_numeric(numeric)?
    } else {
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        named_entity(body)?
    };

    Some((ch, semi + 1))
}

fn decode_numeric(numeric: &str) -> Option<char> {
    let code = match numeric.strip_prefix(|c: char| c == 'x' || c == 'X') {
        Some(hex) if !hex.is_empty() => u32::from_str_radix(hex, 16).ok()?,
        Some(_) => return None,
        None if !numeric.is_empty() && numeric.bytes().all(|b| b.is_ascii_digit()) => {
            numeric.parse::<u32>().ok()?
        }
        None => return None,
    };
    if code == 0 {
        return None;
    }
    char::from_u32(code)
}

fn named_entity(name: &str) -> Option<char> {
    let ch = match name {
        "amp" | "AMP" => '&',
        "lt" | "LT" => '<',
        "gt" | "GT" => '>',
        "quot" | "QUOT" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "hellip" => '\u{2026}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "middot" => '\u{b7}',
        "aacute" => 'á',
        "agrave" => 'à',
        "acirc" => 'â',
        "auml" => 'ä',
        "aring" => 'å',
        "aelig" => 'æ',
        "ccedil" => 'ç',
        "eacute" => 'é',
        "egrave" => 'è',
        "ecirc" => 'ê',
        "euml" => 'ë',
        "iacute" => 'í',
        "igrave" => 'ì',
        "icirc" => 'î',
        "iuml" => 'ï',
        "ntilde" => 'ñ',
        "oacute" => 'ó',
        "ograve" => 'ò',
        "ocirc" => 'ô',
        "ouml" => 'ö',
        "oslash" => 'ø',
        "uacute" => 'ú',
        "ugrave" => 'ù',
        "ucirc" => 'û',
        "uuml" => 'ü',
        "szlig" => 'ß',
        "Aacute" => 'Á',
        "Eacute" => 'É',
        "Ouml" => 'Ö',
        "Uuml" => 'Ü',
        "Auml" => 'Ä',
        "Agrave" => 'À',
        "Acirc" => 'Â',
        "Aring" => 'Å',
        "AElig" => 'Æ',
        "Ccedil" => 'Ç',
        "Egrave" => 'È',
        "Ecirc" => 'Ê',
        "Euml" => 'Ë',
        "Iacute" => 'Í',
        "Igrave" => 'Ì',
        "Icirc" => 'Î',
        "Iuml" => 'Ï',
        "Ntilde" => 'Ñ',
        "Oacute" => 'Ó',
        "Ograve" => 'Ò',
        "Ocirc" => 'Ô',
        "Oslash" => 'Ø',
        "Uacute" => 'Ú',
        "Ugrave" => 'Ù',
        "Ucirc" => 'Û',
        _ => return None,
    };
    Some(ch)
}
