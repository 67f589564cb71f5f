//! Spoiler masking for places that cannot render `||spoiler||` markup

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Spans stop at any line terminator: LF, CR, U+2028 or U+2029
#[allow(clippy::expect_used)]
static SPOILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\|\|)([^\n\r\x{2028}\x{2029}]+?)(\|\|)").expect("spoiler pattern is valid")
});

/// A FULL BLOCK is about two characters wide
const FULL_BLOCK: char = '\u{2588}';

/// Replace every `||text||` span with blocks roughly as wide as the text
///
/// Width is measured in UTF-16 code units, the unit Discord clients lay
/// text out in. Spans do not cross line breaks.
pub fn unicode_spoilerify(content: &str) -> String {
    SPOILER
        .replace_all(content, |caps: &Captures<'_>| {
            let len = caps[2].encode_utf16().count();
            FULL_BLOCK.to_string().repeat(len / 2)
        })
        .into_owned()
}
