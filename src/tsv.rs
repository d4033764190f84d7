// src/tsv.rs
//
// Flat-file codec: one journal per line, tab-separated, header first.
//
//   ISSN <TAB> TITULO <TAB> ESTRATO [<TAB> NOVA_CLASSIF]
//
// Fields holding a tab, a line break or a leading double quote are written
// double-quoted (inner quotes doubled); everything else is written verbatim.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::mem::take;
use std::path::Path;

use crate::compare::Mapping;
use crate::error::{QualisError, Result};
use crate::record::{Record, Tier};

pub const SEP: char = '\t';
pub const HEADER: [&str; 3] = ["ISSN", "TITULO", "ESTRATO"];
pub const COMPARE_HEADER: &str = "NOVA_CLASSIF";
pub const NOT_AVAILABLE: &str = "N/A";

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('\n') || field.contains('\r') || field.starts_with('"')
}

/// Write a single row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header + records. With `comparison`, each line gains the tier the mapping
/// holds for the record's ISSN, or `N/A`.
pub fn write_records<W: Write>(mut w: W, records: &[Record], comparison: Option<&Mapping>) -> io::Result<()> {
    let mut header: Vec<&str> = HEADER.to_vec();
    if comparison.is_some() {
        header.push(COMPARE_HEADER);
    }
    write_row(&mut w, &header, SEP)?;

    for r in records {
        let mut row: Vec<&str> = vec![r.issn.as_str(), r.title.as_str(), r.tier.label()];
        if let Some(map) = comparison {
            row.push(map.get(&r.issn).map_or(NOT_AVAILABLE, |t| t.label()));
        }
        write_row(&mut w, &row, SEP)?;
    }
    Ok(())
}

pub fn to_string(records: &[Record], comparison: Option<&Mapping>) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let _ = write_records(&mut buf, records, comparison);
    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

/// Create/truncate `path` (parent directories included) and write the records.
pub fn save(path: &Path, records: &[Record], comparison: Option<&Mapping>) -> Result<()> {
    logf!("Saving to: {}", path.display());
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut out = BufWriter::new(File::create(path)?);
    write_records(&mut out, records, comparison)?;
    out.flush()?;
    Ok(())
}

/* ---------------- Parsing ---------------- */

/// Split text into rows of fields, tagging each row with its 1-based starting
/// line. Quotes are only special at the start of a field; blank lines vanish.
///
/// Legacy files were written without quoting. A legacy title that starts with
/// `"` is therefore read as a quoted field: its quotes are lost, and without a
/// closing quote the rest of the file runs into that one field.
pub fn parse_rows(text: &str, sep: char) -> Vec<(usize, Vec<String>)> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line = 1usize;
    let mut row_line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if matches!(chars.peek(), Some('"')) => {
                    chars.next(); // doubled quote
                    field.push('"');
                }
                '"' => in_quotes = false,
                c => {
                    if c == '\n' { line += 1; }
                    field.push(c);
                }
            }
            continue;
        }
        match ch {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            c if c == sep => {
                row.push(take(&mut field));
                at_field_start = true;
            }
            '\n' | '\r' => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                flush_row(&mut rows, &mut row, row_line);
                line += 1;
                row_line = line;
                at_field_start = true;
            }
            c => {
                field.push(c);
                at_field_start = false;
            }
        }
    }

    // Trailing row without a final newline (also flushes an unterminated quote).
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        flush_row(&mut rows, &mut row, row_line);
    }
    rows
}

fn flush_row(rows: &mut Vec<(usize, Vec<String>)>, row: &mut Vec<String>, at: usize) {
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push((at, take(row)));
    } else {
        row.clear();
    }
}

/// Parse a saved file's text back into records. The header line, when
/// present, is skipped; every other line must hold exactly three fields.
pub fn parse_str(text: &str) -> Result<Vec<Record>> {
    let mut out = Vec::new();
    for (i, (line, row)) in parse_rows(text, SEP).into_iter().enumerate() {
        if i == 0 && row.first().map(|c| c.trim()) == Some(HEADER[0]) {
            continue;
        }
        let [issn, title, tier]: [String; 3] = row.try_into().map_err(|row: Vec<String>| {
            qerr!(Format, "line {line}: expected 3 fields, found {}", row.len())
        })?;
        let tier = tier
            .parse::<Tier>()
            .map_err(|e| qerr!(Format, "line {line}: {e}"))?;
        out.push(Record::new(issn.trim(), title.trim(), tier));
    }
    Ok(out)
}

/// Read records saved by [`save`] (without a comparison column).
pub fn load(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)?;
    let records = parse_str(&text)
        .map_err(|e| match e {
            QualisError::Format(m) => qerr!(Format, "{}: {m}", path.display()),
            other => other,
        })?;
    logd!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
