// src/import.rs
//
// The 2019 classification PDF: every page's text is a flat list of lines,
// three per journal (ISSN, title, tier). The first page may open with the
// three column headers.

use std::path::{Path, PathBuf};

use crate::error::{QualisError, Result};
use crate::record::{Record, Tier, TierSet};

const HEADER_FIRST_LINE: &str = "ISSN";
const LINES_PER_RECORD: usize = 3;

/// Text of each page of a fixed-layout document, in page order.
pub trait PageSource {
    fn page_texts(&self) -> Result<Vec<String>>;
}

/// PDF pages via `lopdf`.
pub struct LopdfSource {
    path: PathBuf,
}

impl LopdfSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for LopdfSource {
    fn page_texts(&self) -> Result<Vec<String>> {
        let doc = lopdf::Document::load(&self.path)
            .map_err(|e| qerr!(Format, "cannot read {}: {e}", self.path.display()))?;
        doc.get_pages()
            .keys()
            .map(|&n| {
                doc.extract_text(&[n]).map_err(|e| {
                    qerr!(Format, "{} page {n}: cannot extract text: {e}", self.path.display())
                })
            })
            .collect()
    }
}

/// Read a classification PDF from disk.
pub fn read_pdf(path: &Path, valid: &TierSet) -> Result<Vec<Record>> {
    import_document(&LopdfSource::new(path), valid)
}

pub fn import_document(source: &dyn PageSource, valid: &TierSet) -> Result<Vec<Record>> {
    let pages = source.page_texts()?;
    let records = import_pages(&pages, valid)?;
    logf!("Imported {} journals.", records.len());
    Ok(records)
}

/// Group page lines into records. Groups with a tier outside `valid` are
/// skipped (and logged); a page whose line count is off is a format error.
pub fn import_pages<S: AsRef<str>>(pages: &[S], valid: &TierSet) -> Result<Vec<Record>> {
    let mut out = Vec::new();

    for (pageno, text) in pages.iter().enumerate() {
        let text = text.as_ref();
        if text.trim().is_empty() { continue; }

        let mut lines: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
        if pageno == 0 && lines.first() == Some(&HEADER_FIRST_LINE) {
            lines.drain(..LINES_PER_RECORD.min(lines.len()));
        }
        if lines.last() == Some(&"") {
            lines.pop();
        }
        if lines.len() % LINES_PER_RECORD != 0 {
            return Err(QualisError::Format(format!(
                "page {}: {} lines is not a multiple of {LINES_PER_RECORD}",
                pageno + 1,
                lines.len()
            )));
        }

        for group in lines.chunks_exact(LINES_PER_RECORD) {
            let (issn, title, tier) = (group[0].trim(), group[1].trim(), group[2].trim());
            match tier.parse::<Tier>() {
                Ok(t) if valid.contains(t) => out.push(Record::new(issn, title, t)),
                _ => loge!("Tier not found: {issn} {title} {tier:?}"),
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pages(Vec<&'static str>);
    impl PageSource for Pages {
        fn page_texts(&self) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    #[test]
    fn header_only_skipped_on_first_page() {
        let pages = Pages(vec![
            "ISSN\nTÍTULO\nESTRATO\n0001-0001\nJ1\nA1\n",
            "0002-0002\nJ2\nB2\n",
        ]);
        let recs = import_document(&pages, &TierSet::qualis_2019()).unwrap();
        assert_eq!(
            recs,
            vec![Record::new("0001-0001", "J1", Tier::A1), Record::new("0002-0002", "J2", Tier::B2)]
        );
    }

    #[test]
    fn invalid_tier_group_is_skipped_neighbours_kept() {
        let pages = ["1\nJ1\nA1\n2\nJ2\nZ9\n3\nJ3\nC"];
        let recs = import_pages(&pages, &TierSet::qualis_2019()).unwrap();
        assert_eq!(recs, vec![Record::new("1", "J1", Tier::A1), Record::new("3", "J3", Tier::C)]);
    }

    #[test]
    fn tier_outside_valid_set_is_skipped() {
        // B5 is a real tier, but not one of the 2019 classification
        let pages = ["1\nJ1\nB5\n2\nJ2\nA4\n"];
        let recs = import_pages(&pages, &TierSet::qualis_2019()).unwrap();
        assert_eq!(recs, vec![Record::new("2", "J2", Tier::A4)]);
    }

    #[test]
    fn ragged_page_is_format_error() {
        let pages = ["", "1\nJ1\nA1\n2\nJ2\n"];
        let err = import_pages(&pages, &TierSet::qualis_2019()).unwrap_err();
        assert!(matches!(err, QualisError::Format(ref m) if m.contains("page 2")));
    }

    #[test]
    fn blank_pages_are_ignored() {
        let pages = ["   \n", "1\nJ1\nNP"];
        let recs = import_pages(&pages, &TierSet::qualis_2019()).unwrap();
        assert_eq!(recs, vec![Record::new("1", "J1", Tier::NP)]);
    }
}
