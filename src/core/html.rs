// src/core/html.rs
//
// Case-insensitive tag scanning over raw HTML. Naive on purpose: the report
// pages are machine-generated and regular enough for block slicing.

/// ASCII-only lowercase. Non-ASCII chars pass through untouched, so byte
/// offsets in the lowered copy line up with the original.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// A document paired with its lowered copy, so repeated scans over the same
/// page only pay for lowercasing once.
pub struct CiStr<'a> {
    raw: &'a str,
    lc: String,
}

impl<'a> CiStr<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw, lc: to_lower(raw) }
    }

    #[inline] pub fn raw(&self) -> &'a str { self.raw }

    /// Byte offset of `pat` (matched case-insensitively) at or after `from`.
    pub fn find(&self, pat: &str, from: usize) -> Option<usize> {
        let pat = to_lower(pat);
        Some(self.lc.get(from..)?.find(&pat)? + from)
    }

    /// Next `<tag ...>...</tag>` block starting at or after `from`.
    /// `open_tag` is the bare opener (e.g. `"<tr"`); a longer tag name
    /// sharing the prefix (`<track`) is not a match.
    /// Returns `(start of opener, end of closer)`.
    pub fn next_tag_block(&self, open_tag: &str, close_tag: &str, from: usize) -> Option<(usize, usize)> {
        let mut at = from;
        let start = loop {
            let hit = self.find(open_tag, at)?;
            let after = hit + open_tag.len();
            match self.lc.as_bytes().get(after) {
                Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') | Some(b'/') => break hit,
                _ => at = after,
            }
        };
        let open_end = self.raw[start..].find('>')? + start + 1;
        let close = self.find(close_tag, open_end)?;
        Some((start, close + close_tag.len()))
    }

    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.raw[start..end]
    }
}

/// `<td ...>INNER</td>` → `INNER` (nested tags kept).
fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// Visible text of an HTML fragment, tags dropped. Spacing is kept as is.
fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Cell text the way the report shows it: tags stripped, entities decoded,
/// surrounding whitespace trimmed. Inner spacing is part of the value.
pub fn cell_text(block: &str) -> String {
    let inner = inner_after_open_tag(block);
    s!(super::sanitize::normalize_entities(&strip_tags(inner)).trim())
}
