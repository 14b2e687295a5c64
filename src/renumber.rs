use crate::marker::{scan_line, MarkerKind};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Matches a line-break marker for rewriting, numbered or not
static LB_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<lb(\s*|\sn=.*?)/>").unwrap());

/// Running line counter for one document
///
/// Owns the counter and the one-shot seeding flag; a fresh instance is
/// created per document, so batches may process documents in any order.
#[derive(Debug)]
pub struct Renumberer {
    counter: u32,
    seeded: bool,
}

impl Renumberer {
    pub fn new() -> Self {
        Renumberer {
            counter: 1,
            seeded: false,
        }
    }

    /// Rewrite one line, giving every `lb` marker the next counter value
    ///
    /// The line is scanned for control effects before anything is rewritten:
    /// the first `lb` of the document seeds the counter from its declared
    /// number (an absent or non-numeric value leaves the default of 1), and
    /// every `pb` or `cb` resets the counter to 1. Only then are the `lb`
    /// markers substituted, each consuming and incrementing the counter.
    /// Everything else on the line passes through untouched.
    pub fn renumber_line(&mut self, line: &str) -> String {
        for occ in scan_line(line) {
            match occ.kind {
                MarkerKind::LineBreak => {
                    if !self.seeded {
                        self.seeded = true;
                        if let Some(n) = occ.number.as_deref().and_then(|n| n.parse().ok()) {
                            self.counter = n;
                        }
                    }
                }
                MarkerKind::PageBreak | MarkerKind::ColumnBreak => self.counter = 1,
            }
        }

        LB_RE
            .replace_all(line, |_: &Captures| {
                let marker = format!("<lb n=\"{}\"/>", self.counter);
                self.counter += 1;
                marker
            })
            .into_owned()
    }
}

impl Default for Renumberer {
    fn default() -> Self {
        Self::new()
    }
}

/// Renumber all `lb` markers in a document
///
/// Numbering starts at the first `lb`'s declared number (or 1) and restarts
/// at 1 after every `pb` and `cb`. Lines must carry their original
/// terminators; the output is their concatenation, byte-identical except
/// for the rewritten `lb` attributes.
pub fn renumber(lines: &[&str]) -> String {
    let mut renumberer = Renumberer::new();
    lines
        .iter()
        .map(|line| renumberer.renumber_line(line))
        .collect()
}
