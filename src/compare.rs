// src/compare.rs
//
// Cross-referencing two classifications by ISSN.

use std::collections::{BTreeSet, HashMap};

use crate::record::{Record, Tier, TierSet};

/// ISSN → tier, derived from one record sequence.
pub type Mapping = HashMap<String, Tier>;

/// Last write wins when an ISSN repeats.
pub fn build_mapping(records: &[Record]) -> Mapping {
    records.iter().map(|r| (r.issn.clone(), r.tier)).collect()
}

/// Distinct tiers present in `records`, in tier order.
pub fn mapping_tiers(records: &[Record]) -> TierSet {
    records
        .iter()
        .map(|r| r.tier)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Counts of subject records by (mapped tier, own tier). Subjects whose ISSN
/// is missing from the mapping land in the `unmapped` row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountMatrix {
    mapping_order: TierSet,
    subject_order: TierSet,
    counts: Vec<Vec<u64>>, // [mapping][subject]
    unmapped: Vec<u64>,    // [subject]
}

impl CountMatrix {
    pub fn mapping_order(&self) -> &TierSet { &self.mapping_order }
    pub fn subject_order(&self) -> &TierSet { &self.subject_order }

    fn m_idx(&self, m: Tier) -> Option<usize> { self.mapping_order.as_slice().iter().position(|&t| t == m) }
    fn s_idx(&self, s: Tier) -> Option<usize> { self.subject_order.as_slice().iter().position(|&t| t == s) }

    /// Subjects of tier `s` mapped to tier `m`.
    pub fn get(&self, m: Tier, s: Tier) -> u64 {
        match (self.m_idx(m), self.s_idx(s)) {
            (Some(mi), Some(si)) => self.counts[mi][si],
            _ => 0,
        }
    }

    /// Counts for mapped tier `m`, aligned with `subject_order`.
    pub fn row(&self, m: Tier) -> Option<&[u64]> {
        self.m_idx(m).map(|mi| self.counts[mi].as_slice())
    }

    /// Counts for subject tier `s`, aligned with `mapping_order` (unmapped excluded).
    pub fn column(&self, s: Tier) -> Option<Vec<u64>> {
        let si = self.s_idx(s)?;
        Some(self.counts.iter().map(|row| row[si]).collect())
    }

    /// Unmapped subjects, aligned with `subject_order`.
    pub fn unmapped(&self) -> &[u64] { &self.unmapped }

    /// Every subject of tier `s`, mapped or not.
    pub fn column_total(&self, s: Tier) -> u64 {
        match self.s_idx(s) {
            Some(si) => self.counts.iter().map(|row| row[si]).sum::<u64>() + self.unmapped[si],
            None => 0,
        }
    }
}

/// Cross-tabulate `subjects` (own tier on one axis) against `mapping` (their
/// tier in the other classification on the other axis).
pub fn cross_tabulate(
    subjects: &[Record],
    mapping: &Mapping,
    subject_order: &TierSet,
    mapping_order: &TierSet,
) -> CountMatrix {
    let mut matrix = CountMatrix {
        mapping_order: mapping_order.clone(),
        subject_order: subject_order.clone(),
        counts: vec![vec![0; subject_order.len()]; mapping_order.len()],
        unmapped: vec![0; subject_order.len()],
    };

    let mut outside = 0usize;
    for r in subjects {
        let Some(si) = matrix.s_idx(r.tier) else { continue };
        match mapping.get(&r.issn) {
            None => matrix.unmapped[si] += 1,
            Some(&m) => match matrix.m_idx(m) {
                Some(mi) => matrix.counts[mi][si] += 1,
                None => outside += 1,
            },
        }
    }
    if outside > 0 {
        logd!("{outside} records mapped to tiers outside the requested order");
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use Tier::*;

    fn old() -> Vec<Record> {
        vec![
            Record::new("1", "J1", B1),
            Record::new("2", "J2", B1),
            Record::new("3", "J3", C),
            Record::new("4", "J4", A1),
        ]
    }

    fn new() -> Vec<Record> {
        vec![
            Record::new("1", "J1", A1),
            Record::new("2", "J2", A3),
            Record::new("2", "J2", A4), // later entry wins
            Record::new("4", "J4", A1),
        ]
    }

    #[test]
    fn mapping_is_last_write_wins() {
        let m = build_mapping(&new());
        assert_eq!(m.len(), 3);
        assert_eq!(m["2"], A4);
    }

    #[test]
    fn mapping_tiers_sorted_and_distinct() {
        assert_eq!(mapping_tiers(&new()).as_slice(), &[A1, A3, A4]);
    }

    #[test]
    fn cross_tab_counts_and_unmapped() {
        let map = build_mapping(&new());
        let subject_order = TierSet::new(vec![A1, B1, C]);
        let mapping_order = mapping_tiers(&new());
        let m = cross_tabulate(&old(), &map, &subject_order, &mapping_order);

        assert_eq!(m.get(A1, B1), 1);
        assert_eq!(m.get(A4, B1), 1);
        assert_eq!(m.get(A1, A1), 1);
        assert_eq!(m.get(A3, B1), 0);
        assert_eq!(m.row(A1), Some(&[1, 1, 0][..]));
        assert_eq!(m.column(B1), Some(vec![1, 0, 1]));
        assert_eq!(m.unmapped(), &[0, 0, 1]);
    }

    #[test]
    fn column_totals_equal_subject_counts() {
        let map = build_mapping(&new());
        let subject_order = TierSet::qualis_legacy();
        let m = cross_tabulate(&old(), &map, &subject_order, &mapping_tiers(&new()));
        for s in subject_order.iter() {
            let expected = old().iter().filter(|r| r.tier == s).count() as u64;
            assert_eq!(m.column_total(s), expected, "tier {s}");
        }
    }
}
