//! Splitting a document into per-account or per-commodity sections.

use lazy_static::lazy_static;
use tracing::debug;

use super::rules::patterns::TimedRegex;
use super::rules::trimmed_lines;

/// Splits document text into the sections an extractor consumes.
///
/// Implementations are deterministic: the same text always yields the same
/// sections in the same order.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// The whole document is one section.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeDocument;

impl Segmenter for WholeDocument {
    fn segment(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        vec![text.to_string()]
    }
}

/// Every match of a header-to-terminator pattern is a section; text between
/// matches is ignored.
#[derive(Debug, Clone)]
pub struct DelimitedSections {
    pattern: TimedRegex,
}

impl DelimitedSections {
    pub fn new(pattern: TimedRegex) -> Self {
        Self { pattern }
    }
}

impl Segmenter for DelimitedSections {
    fn segment(&self, text: &str) -> Vec<String> {
        let sections: Vec<String> = self
            .pattern
            .captures_all(text)
            .iter()
            .filter_map(|caps| caps.get(0))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        debug!(count = sections.len(), "Delimited sections found");
        sections
    }
}

lazy_static! {
    static ref PAGE_OF_TOTAL: TimedRegex = TimedRegex::new(r"(?i)\bof\s+(\d+)\b").unwrap();
}

/// Each section runs from the end of the previous one up to and including a
/// terminating match. Page footers of the form "of N", where N is the page
/// total read from the document's second line, are removed first so that
/// they do not leak into names and addresses.
#[derive(Debug, Clone)]
pub struct TerminatedSections {
    terminator: TimedRegex,
}

impl TerminatedSections {
    /// `terminator` must match the text that closes a section; everything
    /// before it back to the previous terminator belongs to the section.
    pub fn new(terminator: TimedRegex) -> Self {
        Self { terminator }
    }

    fn strip_page_totals(text: &str) -> String {
        let Some(total) = trimmed_lines(text)
            .nth(1)
            .and_then(|line| PAGE_OF_TOTAL.capture_str(line))
        else {
            return text.to_string();
        };

        let Ok(pattern) = TimedRegex::new(&format!(r"(?i)\bof\s*{}\b", regex::escape(total)))
        else {
            return text.to_string();
        };
        pattern.replace_all(text, "").into_owned()
    }
}

impl Segmenter for TerminatedSections {
    fn segment(&self, text: &str) -> Vec<String> {
        let cleaned = Self::strip_page_totals(text);

        let mut sections = Vec::new();
        let mut start = 0;
        for caps in self.terminator.captures_all(&cleaned) {
            let Some(m) = caps.get(0) else { continue };
            let section = cleaned[start..m.end()].trim();
            if !section.is_empty() {
                sections.push(section.to_string());
            }
            start = m.end();
        }

        debug!(count = sections.len(), "Terminated sections found");
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminated() -> TerminatedSections {
        TerminatedSections::new(
            TimedRegex::new(r"(?i)CURRENT\s+CHARGES\s*-?\$\d{1,3}(?:,\d{3})*\.\d{2}").unwrap(),
        )
    }

    #[test]
    fn test_whole_document() {
        assert_eq!(WholeDocument.segment("a\nb"), vec!["a\nb".to_string()]);
        assert!(WholeDocument.segment("  \n ").is_empty());
    }

    #[test]
    fn test_delimited_sections_skip_text_between_matches() {
        let seg = DelimitedSections::new(TimedRegex::new(r"(?ms)^BEGIN.*?^END").unwrap());
        let text = "preamble\nBEGIN one\nEND\nnoise\nBEGIN two\nEND\ntrailer";
        assert_eq!(
            seg.segment(text),
            vec!["BEGIN one\nEND".to_string(), "BEGIN two\nEND".to_string()]
        );
        assert!(seg.segment("nothing here").is_empty());
    }

    #[test]
    fn test_terminated_sections_include_terminator() {
        let text = "\
Header
Page 1 of 2
Member account # 1
CURRENT CHARGES $10.00
Member account # 2
CURRENT CHARGES $1,020.50
Trailing footer";
        let sections = terminated().segment(text);
        assert_eq!(sections.len(), 2);
        assert!(sections[0].starts_with("Header"));
        assert!(sections[0].ends_with("CURRENT CHARGES $10.00"));
        assert_eq!(
            sections[1],
            "Member account # 2\nCURRENT CHARGES $1,020.50"
        );
    }

    #[test]
    fn test_page_totals_are_stripped() {
        let text = "\
BC Hydro
Jan 31, 2025 Page 1 of 3
Member account # 1 Page 2 of 3
Office of 32 staff
CURRENT CHARGES $10.00";
        let sections = terminated().segment(text);
        assert_eq!(sections.len(), 1);
        assert!(!sections[0].contains("of 3"));
        assert!(sections[0].contains("Member account # 1 Page 2"));
        assert!(sections[0].contains("Office of 32 staff"));
    }

    #[test]
    fn test_segmentation_is_repeatable() {
        let text = "x\ny\nCURRENT CHARGES $1.00\nz\nCURRENT CHARGES $2.00";
        let seg = terminated();
        assert_eq!(seg.segment(text), seg.segment(text));
        assert_eq!(seg.segment(text).len(), 2);
    }
}
