use regex::Regex;
use std::sync::LazyLock;

/// Matches a self-closing break marker: `<pb/>`, `<cb n="3"/>`, `<lb n='12'/>`, ...
///
/// Group 1 is the tag name, group 2 the raw attribute text (possibly empty).
/// The attribute alternative requires exactly one whitespace before `n=` and
/// matches non-greedily up to the closing `/>`.
static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(pb|cb|lb)(\s*?|\sn=.*?)/>").unwrap());

/// Extracts the value of an `n="..."` / `n='...'` attribute (non-greedy).
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"n=["'](.*?)["']"#).unwrap());

/// The three marker kinds recognized in a transcription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Page break: `<pb/>`
    PageBreak,
    /// Column break: `<cb/>`
    ColumnBreak,
    /// Line break: `<lb/>`
    LineBreak,
}

impl MarkerKind {
    fn from_tag(tag: &str) -> Option<MarkerKind> {
        match tag.to_ascii_lowercase().as_str() {
            "pb" => Some(MarkerKind::PageBreak),
            "cb" => Some(MarkerKind::ColumnBreak),
            "lb" => Some(MarkerKind::LineBreak),
            _ => None,
        }
    }
}

/// One break marker found on a line of text
///
/// Produced transiently by [`scan_line`]; occurrences are not persisted
/// anywhere, the engines walk them in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerOccurrence {
    /// Which kind of break this marker denotes
    pub kind: MarkerKind,
    /// Declared number from the `n` attribute, if present
    pub number: Option<String>,
    /// Byte offset of the marker within its line
    pub position: usize,
}

/// Scan one line of raw text for break markers
///
/// Returns all well-formed self-closing `pb`/`cb`/`lb` markers in
/// left-to-right order. Tag names match case-insensitively. Text that is
/// not such a marker is ignored; a line without markers yields an empty
/// vector, never an error.
///
/// # Example
/// ```
/// use lbmark::{scan_line, MarkerKind};
/// let occs = scan_line(r#"text <pb n="12"/> more <lb/>"#);
/// assert_eq!(occs.len(), 2);
/// assert_eq!(occs[0].kind, MarkerKind::PageBreak);
/// assert_eq!(occs[0].number.as_deref(), Some("12"));
/// assert_eq!(occs[1].kind, MarkerKind::LineBreak);
/// assert_eq!(occs[1].number, None);
/// ```
pub fn scan_line(line: &str) -> Vec<MarkerOccurrence> {
    MARKER_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = MarkerKind::from_tag(caps.get(1)?.as_str())?;
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            Some(MarkerOccurrence {
                kind,
                number: extract_number(attrs),
                position: whole.start(),
            })
        })
        .collect()
}

/// Extract the declared number from a marker's raw attribute text
///
/// Accepts single or double quotes with a non-greedy match. Returns `None`
/// when no `n` attribute is present; malformed attribute text is never an
/// error, it simply yields `None`.
pub fn extract_number(attrs: &str) -> Option<String> {
    NUMBER_RE
        .captures(attrs)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
