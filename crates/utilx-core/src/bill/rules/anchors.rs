//! Keyword-anchored line lookup.
//!
//! Anchors are matched ASCII case-insensitively. Lowercasing ASCII keeps
//! byte offsets intact, so positions found in the folded copy index straight
//! into the original text. Lines end at `\n`; a trailing `\r` is removed by
//! trimming, so CRLF and LF text give the same lines.

/// Byte offset of the first case-insensitive occurrence of `anchor`.
pub fn find_anchor(text: &str, anchor: &str) -> Option<usize> {
    if anchor.is_empty() {
        return None;
    }
    text.to_ascii_lowercase()
        .find(&anchor.to_ascii_lowercase())
}

/// Whether `anchor` occurs anywhere in `text`, ignoring ASCII case.
pub fn contains_anchor(text: &str, anchor: &str) -> bool {
    find_anchor(text, anchor).is_some()
}

/// The trimmed line holding the first occurrence of `anchor`.
pub fn line_containing<'a>(text: &'a str, anchor: &str) -> Option<&'a str> {
    let idx = find_anchor(text, anchor)?;
    let (start, end) = line_bounds(text, idx);
    Some(text[start..end].trim())
}

/// The trimmed line right after the line holding the first occurrence of
/// `anchor`. `None` when the anchor is missing or sits on the last line; a
/// blank trailing segment after the final newline is not a line.
pub fn line_after<'a>(text: &'a str, anchor: &str) -> Option<&'a str> {
    let idx = find_anchor(text, anchor)?;
    let eol = text[idx..].find('\n')? + idx;
    let start = eol + 1;
    let (end, is_last) = match text[start..].find('\n') {
        Some(i) => (start + i, false),
        None => (text.len(), true),
    };

    let line = text[start..end].trim();
    if is_last && line.is_empty() {
        return None;
    }
    Some(line)
}

/// Text on the anchor's line that comes before the anchor, trimmed.
pub fn text_before<'a>(text: &'a str, anchor: &str) -> Option<&'a str> {
    let idx = find_anchor(text, anchor)?;
    let (start, _) = line_bounds(text, idx);
    Some(text[start..idx].trim())
}

/// Lines of `text` with surrounding whitespace (and any `\r`) removed.
pub fn trimmed_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim)
}

/// Rewrite CRLF and lone CR line breaks as LF.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn line_bounds(text: &str, idx: usize) -> (usize, usize) {
    let start = text[..idx].rfind('\n').map_or(0, |i| i + 1);
    let end = text[idx..].find('\n').map_or(text.len(), |i| idx + i);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BILL: &str = "City of Somewhere\nACCT NUMBER: 1001 BILLING\nName: Jane\n";

    #[test]
    fn test_line_containing() {
        assert_eq!(
            line_containing(BILL, "acct number:"),
            Some("ACCT NUMBER: 1001 BILLING")
        );
        assert_eq!(line_containing(BILL, "City"), Some("City of Somewhere"));
        assert_eq!(line_containing(BILL, "missing"), None);
    }

    #[test]
    fn test_line_after() {
        assert_eq!(line_after(BILL, "ACCT NUMBER"), Some("Name: Jane"));
        assert_eq!(line_after("only line", "only"), None);
        assert_eq!(line_after("last\n", "last"), None);
        assert_eq!(line_after("last\r\n  ", "last"), None);
        assert_eq!(line_after("first\n\nthird", "first"), Some(""));
        assert_eq!(line_after(BILL, ""), None);
    }

    #[test]
    fn test_crlf_matches_lf() {
        let crlf = BILL.replace('\n', "\r\n");
        assert_eq!(
            line_containing(&crlf, "ACCT NUMBER"),
            line_containing(BILL, "ACCT NUMBER")
        );
        assert_eq!(line_after(&crlf, "ACCT NUMBER"), line_after(BILL, "ACCT NUMBER"));
        assert_eq!(
            trimmed_lines(&crlf).collect::<Vec<_>>(),
            trimmed_lines(BILL).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_text_before() {
        assert_eq!(
            text_before("x\nACME HOLDINGS Product: Gas\n", "Product:"),
            Some("ACME HOLDINGS")
        );
    }

    #[test]
    fn test_non_ascii_text_keeps_offsets() {
        let text = "Café Québec\nAccount Number: 501722953\n";
        assert_eq!(
            line_containing(text, "account number"),
            Some("Account Number: 501722953")
        );
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }
}
