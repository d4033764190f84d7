// src/remote/table.rs
//
// Results table of the report: `<div class="resultados"><table>...<tbody>`
// with rows of four cells (ISSN, title, evaluation area, tier).
// Works on both the full page and the partial-response XML of later pages,
// since the latter carries the same markup inside CDATA.

use crate::core::html::{cell_text, CiStr};
use crate::record::{Record, Tier};

const RESULTS_CLASS: &str = "resultados";
const CELLS_PER_ROW: usize = 4;

/// All records of one page, in page order. No container → empty, not an error.
pub fn parse_results(body: &str) -> Vec<Record> {
    let doc = CiStr::new(body);

    let Some(container) = find_div_with_class(&doc, RESULTS_CLASS) else {
        logd!("Found no records (no results container).");
        return Vec::new();
    };
    let Some((table_s, table_e)) = doc.next_tag_block("<table", "</table>", container) else {
        logd!("Found no records (results container without a table).");
        return Vec::new();
    };
    // Without an explicit <tbody>, the rows sit directly in the table.
    let (tb_s, tb_e) = doc
        .next_tag_block("<tbody", "</tbody>", table_s)
        .filter(|&(_, end)| end <= table_e)
        .unwrap_or((table_s, table_e));

    let mut records = Vec::new();
    let mut pos = tb_s;
    while let Some((tr_s, tr_e)) = doc.next_tag_block("<tr", "</tr>", pos) {
        if tr_e > tb_e { break; }
        pos = tr_e;

        let cells = row_cells(&doc, tr_s, tr_e);
        if cells.is_empty() { continue; } // header/spacer rows
        if cells.len() != CELLS_PER_ROW {
            logw!("Skipping results row with {} cells (expected {}): {:?}", cells.len(), CELLS_PER_ROW, cells);
            continue;
        }

        let [issn, title, _area, tier]: [String; CELLS_PER_ROW] = match cells.try_into() {
            Ok(arr) => arr,
            Err(_) => continue,
        };
        match tier.parse::<Tier>() {
            Ok(tier) => records.push(Record { issn, title, tier }),
            Err(e) => loge!("Skipping {issn} {title:?}: {e}"),
        }
    }

    match (records.first(), records.last()) {
        (Some(first), Some(last)) => {
            logd!("Found {} records, {:?} to {:?}", records.len(), first.title, last.title)
        }
        _ => logd!("Found no records."),
    }
    records
}

/// Text of every `<td>` in the row `[tr_s, tr_e)`.
fn row_cells(doc: &CiStr<'_>, tr_s: usize, tr_e: usize) -> Vec<String> {
    let mut cells = Vec::with_capacity(CELLS_PER_ROW);
    let mut td_pos = tr_s;
    while let Some((td_s, td_e)) = doc.next_tag_block("<td", "</td>", td_pos) {
        if td_e > tr_e { break; }
        cells.push(cell_text(doc.slice(td_s, td_e)));
        td_pos = td_e;
    }
    cells
}

/// Offset just past the opening tag of the first `<div>` whose class list
/// contains `class`.
fn find_div_with_class(doc: &CiStr<'_>, class: &str) -> Option<usize> {
    let raw = doc.raw();
    let mut from = 0;
    while let Some(start) = doc.find("<div", from) {
        let open_end = raw[start..].find('>')? + start + 1;
        if class_list(&raw[start..open_end]).any(|c| c.eq_ignore_ascii_case(class)) {
            return Some(open_end);
        }
        from = open_end;
    }
    None
}

/// Whitespace-separated entries of the `class` attribute of one opening tag.
fn class_list(open_tag: &str) -> impl Iterator<Item = &str> {
    let lc = open_tag.to_ascii_lowercase();
    let at = lc
        .match_indices("class=")
        .map(|(i, _)| i)
        .find(|&i| lc[..i].ends_with(|c: char| c.is_ascii_whitespace()));
    let value = at.and_then(|i| {
        let rest = &open_tag[i + "class=".len()..];
        match rest.chars().next() {
            Some(q @ ('"' | '\'')) => rest[1..].split(q).next(),
            Some(_) => rest.split(|c: char| c.is_whitespace() || c == '>' || c == '/').next(),
            None => None,
        }
    });
    value.unwrap_or("").split_whitespace()
}
