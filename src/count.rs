use crate::marker::{scan_line, MarkerKind, MarkerOccurrence};
use serde::Serialize;
use std::collections::HashSet;

/// Placeholder used when a page or column marker carries no `n` attribute
const NO_NUMBER: &str = "No number";

/// Line-break count for one folio (page, or page/column) segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolioCount {
    /// Folio identifier: page number, optionally suffixed with `/<column>`
    pub folio: String,
    /// Number of line-break markers in the segment
    pub line_breaks: usize,
}

/// Statistics for one transcription document
///
/// `folios` holds the displayed per-folio table: the raw segment tallies are
/// paired against the folio identifiers offset by one, so the tally of text
/// before the first page boundary is dropped (see [`count`]).
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Total `pb` markers in the document
    pub page_count: usize,
    /// Total `cb` markers in the document
    pub column_count: usize,
    /// Total `lb` markers in the document
    pub line_break_count: usize,
    /// Per-folio line-break counts, in document order
    pub folios: Vec<FolioCount>,
    /// Set when the interior folios disagree on their line count
    pub suspicious: bool,
}

/// A page break adjacent to a column break must not cut on its own: the
/// column break performs the cut and carries the combined `page/column`
/// identifier. Adjacent means the next occurrence on the same line, or the
/// first occurrence on the next line, is a `cb`. Look-ahead never goes
/// further than the next line.
fn page_cut_suppressed(per_line: &[Vec<MarkerOccurrence>], line: usize, idx: usize) -> bool {
    if per_line[line].get(idx + 1).map(|occ| occ.kind) == Some(MarkerKind::ColumnBreak) {
        return true;
    }
    per_line
        .get(line + 1)
        .and_then(|occs| occs.first())
        .map(|occ| occ.kind)
        == Some(MarkerKind::ColumnBreak)
}

/// Count line-break markers per page/column segment
///
/// Walks the document once to tally marker totals, then segments it: every
/// `cb` closes the current segment, and every `pb` does too unless its
/// column break follows adjacently (see [`page_cut_suppressed`]). The final
/// open segment is always closed at end of document, even when empty.
///
/// The displayed folio table pairs each folio identifier with the segment
/// tally one position later: the leading tally covers text before the first
/// boundary and is dropped from display. The anomaly flag looks only at the
/// interior tallies (skipping the first two and the last, where shorter
/// pages are expected) and is set when they take more than one distinct
/// value.
pub fn count(lines: &[&str]) -> Report {
    let per_line: Vec<Vec<MarkerOccurrence>> = lines.iter().map(|line| scan_line(line)).collect();

    let mut page_count = 0;
    let mut column_count = 0;
    let mut line_break_count = 0;
    for occ in per_line.iter().flatten() {
        match occ.kind {
            MarkerKind::PageBreak => page_count += 1,
            MarkerKind::ColumnBreak => column_count += 1,
            MarkerKind::LineBreak => line_break_count += 1,
        }
    }

    let mut folios: Vec<String> = Vec::new();
    let mut tallies: Vec<usize> = Vec::new();
    let mut tally = 0;
    let mut page = NO_NUMBER.to_string();

    for (line_idx, occs) in per_line.iter().enumerate() {
        // The column suffix does not carry over to the next line
        let mut column_suffix = String::new();

        for (occ_idx, occ) in occs.iter().enumerate() {
            match occ.kind {
                MarkerKind::LineBreak => tally += 1,
                MarkerKind::PageBreak | MarkerKind::ColumnBreak => {
                    let number = occ.number.clone().unwrap_or_else(|| NO_NUMBER.to_string());
                    let cuts = match occ.kind {
                        MarkerKind::PageBreak => {
                            page = number;
                            !page_cut_suppressed(&per_line, line_idx, occ_idx)
                        }
                        _ => {
                            column_suffix = format!("/{}", number);
                            true
                        }
                    };
                    if cuts {
                        folios.push(format!("{}{}", page, column_suffix));
                        tallies.push(tally);
                        tally = 0;
                    }
                }
            }
        }
    }
    tallies.push(tally);

    let interior: &[usize] = if tallies.len() > 3 {
        &tallies[2..tallies.len() - 1]
    } else {
        &[]
    };
    let suspicious = interior.iter().collect::<HashSet<_>>().len() > 1;

    let folio_counts = folios
        .into_iter()
        .zip(tallies.into_iter().skip(1))
        .map(|(folio, line_breaks)| FolioCount { folio, line_breaks })
        .collect();

    Report {
        page_count,
        column_count,
        line_break_count,
        folios: folio_counts,
        suspicious,
    }
}

/// Render a report as the tab-separated text block appended to count logs
///
/// One header line with the document name and marker totals, one line per
/// folio, and a trailing warning when the counts look irregular.
pub fn format_report(name: &str, report: &Report) -> String {
    let mut out = format!(
        "{}\t(PB: {}\tCB: {}\tLB: {})",
        name, report.page_count, report.column_count, report.line_break_count
    );
    for entry in &report.folios {
        out.push_str(&format!("\n\t{}\t{}", entry.folio, entry.line_breaks));
    }
    if report.suspicious {
        out.push_str("\n\t\t!!! (suspicious number of lines)");
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_no_markers() {
        let lines = ["plain prose", "more prose", ""];
        let report = count(&lines);

        assert_eq!(report.page_count, 0);
        assert_eq!(report.column_count, 0);
        assert_eq!(report.line_break_count, 0);
        // The single synthetic leading segment is dropped from display
        assert!(report.folios.is_empty());
        assert!(!report.suspicious);
    }

    #[test]
    fn test_count_totals() {
        let lines = [
            r#"<pb n="1"/><lb/><lb/>"#,
            r#"<cb n="2"/><lb/>"#,
            r#"text <lb/> text"#,
        ];
        let report = count(&lines);

        assert_eq!(report.page_count, 1);
        assert_eq!(report.column_count, 1);
        assert_eq!(report.line_break_count, 4);
    }

    #[test]
    fn test_count_per_folio_offset_pairing() {
        // The tally before the first pb belongs to no folio and is dropped;
        // each folio displays the tally of the segment it opens.
        let lines = [
            "<lb/>",
            r#"<pb n="1"/><lb/><lb/>"#,
            r#"<pb n="2"/><lb/><lb/><lb/>"#,
        ];
        let report = count(&lines);

        assert_eq!(
            report.folios,
            vec![
                FolioCount {
                    folio: "1".to_string(),
                    line_breaks: 2
                },
                FolioCount {
                    folio: "2".to_string(),
                    line_breaks: 3
                },
            ]
        );
    }

    #[test]
    fn test_adjacent_pb_cb_cuts_once() {
        // pb immediately followed by cb (on the next line) must not cut;
        // the cb cuts alone, carrying the combined page/column identifier.
        let lines = [r#"<pb n="3"/><lb/><lb/>"#, r#"<cb n="1"/><lb/>"#];
        let report = count(&lines);

        assert_eq!(report.folios.len(), 1);
        assert_eq!(report.folios[0].folio, "3/1");
        assert_eq!(report.folios[0].line_breaks, 1);
    }

    #[test]
    fn test_adjacent_pb_cb_same_line() {
        let lines = [r#"<pb n="7"/><cb n="2"/><lb/><lb/><lb/>"#, r#"<pb n="8"/>"#];
        let report = count(&lines);

        assert_eq!(report.folios.len(), 2);
        assert_eq!(report.folios[0].folio, "7/2");
        assert_eq!(report.folios[0].line_breaks, 3);
        assert_eq!(report.folios[1].folio, "8");
        assert_eq!(report.folios[1].line_breaks, 0);
    }

    #[test]
    fn test_pb_without_cb_cuts() {
        let lines = [r#"<pb n="1"/><lb/>"#, r#"<pb n="2"/><lb/><lb/>"#];
        let report = count(&lines);

        assert_eq!(report.folios.len(), 2);
        assert_eq!(report.folios[0].folio, "1");
        assert_eq!(report.folios[0].line_breaks, 1);
        assert_eq!(report.folios[1].folio, "2");
        assert_eq!(report.folios[1].line_breaks, 2);
    }

    #[test]
    fn test_pb_without_number() {
        let lines = ["<pb/><lb/>", r#"<pb n="2"/>"#];
        let report = count(&lines);

        assert_eq!(report.folios[0].folio, "No number");
    }

    #[test]
    fn test_final_segment_always_recorded() {
        // The last pb opens a segment with no line breaks at all
        let lines = [r#"<pb n="1"/><lb/>"#, r#"<pb n="2"/>"#];
        let report = count(&lines);

        assert_eq!(report.folios.len(), 2);
        assert_eq!(report.folios[1].line_breaks, 0);
    }

    #[test]
    fn test_regular_interior_not_suspicious() {
        // Tallies: [0, 2, 3, 3, 3, 1] -> interior [3, 3, 3]
        let lines = [
            r#"<pb n="1"/><lb/><lb/>"#,
            r#"<pb n="2"/><lb/><lb/><lb/>"#,
            r#"<pb n="3"/><lb/><lb/><lb/>"#,
            r#"<pb n="4"/><lb/><lb/><lb/>"#,
            r#"<pb n="5"/><lb/>"#,
        ];
        let report = count(&lines);

        assert!(!report.suspicious);
    }

    #[test]
    fn test_irregular_interior_suspicious() {
        // Tallies: [0, 2, 3, 2, 3, 1] -> interior [3, 2, 3]
        let lines = [
            r#"<pb n="1"/><lb/><lb/>"#,
            r#"<pb n="2"/><lb/><lb/><lb/>"#,
            r#"<pb n="3"/><lb/><lb/>"#,
            r#"<pb n="4"/><lb/><lb/><lb/>"#,
            r#"<pb n="5"/><lb/>"#,
        ];
        let report = count(&lines);

        assert!(report.suspicious);
    }

    #[test]
    fn test_short_document_never_suspicious() {
        // Fewer than four tallies leaves no interior to compare
        let lines = [r#"<pb n="1"/><lb/>"#, r#"<pb n="2"/><lb/><lb/><lb/>"#];
        let report = count(&lines);

        assert!(!report.suspicious);
    }

    #[test]
    fn test_format_report_plain() {
        let lines = [r#"<pb n="1"/><lb/><lb/>"#, r#"<pb n="2"/><lb/>"#];
        let report = count(&lines);
        let text = format_report("Berne111.xml", &report);

        assert_eq!(
            text,
            "Berne111.xml\t(PB: 2\tCB: 0\tLB: 3)\n\t1\t2\n\t2\t1\n"
        );
    }

    #[test]
    fn test_format_report_suspicious_warning() {
        let lines = [
            r#"<pb n="1"/><lb/>"#,
            r#"<pb n="2"/><lb/><lb/>"#,
            r#"<pb n="3"/><lb/>"#,
            r#"<pb n="4"/><lb/><lb/>"#,
            r#"<pb n="5"/>"#,
        ];
        let report = count(&lines);
        let text = format_report("doc.xml", &report);

        assert!(report.suspicious);
        assert!(text.ends_with("\t\t!!! (suspicious number of lines)\n"));
    }

    #[test]
    fn test_format_report_zero_markers() {
        let report = count(&["no markers here"]);
        let text = format_report("doc.xml", &report);

        assert_eq!(text, "doc.xml\t(PB: 0\tCB: 0\tLB: 0)\n");
    }
}
