//! Turning response bodies into UTF-8 text.
//!
//! Recipe sites still serve the occasional Latin-1 page, so the charset is
//! taken from the Content-Type header or a `<meta>` tag near the top of the
//! document before falling back to UTF-8.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;

/// How far into the document a `<meta charset>` declaration is looked for.
const META_SCAN_LEN: usize = 1024;

/// Matches `<meta charset="x">` and `<meta http-equiv=... content="...; charset=x">`.
static META_CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?charset\s*=\s*["']?\s*([A-Za-z0-9._:-]+)"#)
        .expect("Invalid meta charset regex")
});

/// Decode raw bytes, preferring the header charset, then a meta tag, then UTF-8.
/// Invalid UTF-8 is replaced rather than rejected.
pub(crate) fn decode_bytes_to_utf8(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_html_meta(bytes));

    match declared {
        Some(encoding) if encoding != UTF_8 => {
            let (decoded, _, had_errors) = encoding.decode(bytes);
            if had_errors {
                tracing::debug!(encoding = encoding.name(), "replaced malformed sequences");
            }
            decoded.into_owned()
        }
        _ => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(e) => {
                tracing::debug!("falling back to lossy UTF-8 conversion: {}", e);
                String::from_utf8_lossy(bytes).into_owned()
            }
        },
    }
}

/// e.g. "text/html; charset=iso-8859-1" -> windows-1252
fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        if value.is_empty() {
            return None;
        }
        Encoding::for_label(value.as_bytes())
    })
}

fn charset_from_html_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SCAN_LEN)];
    let label = META_CHARSET_REGEX.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes())
}
