// src/record.rs
//
// The unit of data flowing through every stage: one journal with its tier.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Qualis classification label. Closed set: anything else is rejected at ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    A1,
    A2,
    A3,
    A4,
    B1,
    B2,
    B3,
    B4,
    B5,
    C,
    NP,
}

impl Tier {
    pub const ALL: [Tier; 11] = [
        Tier::A1, Tier::A2, Tier::A3, Tier::A4,
        Tier::B1, Tier::B2, Tier::B3, Tier::B4, Tier::B5,
        Tier::C, Tier::NP,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tier::A1 => "A1",
            Tier::A2 => "A2",
            Tier::A3 => "A3",
            Tier::A4 => "A4",
            Tier::B1 => "B1",
            Tier::B2 => "B2",
            Tier::B3 => "B3",
            Tier::B4 => "B4",
            Tier::B5 => "B5",
            Tier::C => "C",
            Tier::NP => "NP",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a label is not one of `Tier::ALL`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownTier(pub String);

impl fmt::Display for UnknownTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tier {:?}", self.0)
    }
}

impl std::error::Error for UnknownTier {}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Tier::ALL
            .iter()
            .copied()
            .find(|tier| tier.label() == t)
            .ok_or_else(|| UnknownTier(t.to_string()))
    }
}

/// Ordered list of tiers. Order only drives layout and iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierSet(Vec<Tier>);

impl TierSet {
    pub fn new(tiers: Vec<Tier>) -> Self { Self(tiers) }

    /// Tiers of the 2019 classification (the PDF).
    pub fn qualis_2019() -> Self {
        use Tier::*;
        Self(vec![A1, A2, A3, A4, B1, B2, B3, B4, C, NP])
    }

    /// Tiers of the classification currently served by the portal.
    pub fn qualis_legacy() -> Self {
        use Tier::*;
        Self(vec![A1, A2, B1, B2, B3, B4, B5, C])
    }

    /// Parse a comma-separated list such as `"A1,A2,B1"`.
    pub fn parse_list(s: &str) -> Result<Self, UnknownTier> {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Tier::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    #[inline] pub fn contains(&self, tier: Tier) -> bool { self.0.contains(&tier) }
    #[inline] pub fn len(&self) -> usize { self.0.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }
    #[inline] pub fn as_slice(&self) -> &[Tier] { &self.0 }
    pub fn iter(&self) -> impl Iterator<Item = Tier> + '_ { self.0.iter().copied() }

    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|t| s!(t.label())).collect()
    }
}

impl FromIterator<Tier> for TierSet {
    fn from_iter<I: IntoIterator<Item = Tier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One journal: ISSN, title and its tier in one classification.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub issn: String,
    pub title: String,
    pub tier: Tier,
}

impl Record {
    pub fn new(issn: impl Into<String>, title: impl Into<String>, tier: Tier) -> Self {
        Self { issn: issn.into(), title: title.into(), tier }
    }
}

/// Keep the first occurrence of every distinct record, preserving order.
/// Equality is on the whole record: the same ISSN under two tiers survives twice.
pub fn dedup_records(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<Record> = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());
    for r in records {
        if seen.insert(r.clone()) {
            out.push(r);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_parse_is_exact_after_trim() {
        assert_eq!(" B2 ".parse::<Tier>().unwrap(), Tier::B2);
        assert_eq!("NP".parse::<Tier>().unwrap(), Tier::NP);
        assert!("b2".parse::<Tier>().is_err());
        assert_eq!("Z9".parse::<Tier>(), Err(UnknownTier(s!("Z9"))));
    }

    #[test]
    fn tier_sets_match_both_classifications() {
        let new = TierSet::qualis_2019();
        let old = TierSet::qualis_legacy();
        assert!(new.contains(Tier::A4) && !new.contains(Tier::B5));
        assert!(old.contains(Tier::B5) && !old.contains(Tier::NP));
        assert_eq!(old.labels(), vec!["A1", "A2", "B1", "B2", "B3", "B4", "B5", "C"]);
    }

    #[test]
    fn parse_list_skips_blanks_and_rejects_unknown() {
        let set = TierSet::parse_list("A1, B5,,C").unwrap();
        assert_eq!(set.as_slice(), &[Tier::A1, Tier::B5, Tier::C]);
        assert!(TierSet::parse_list("A1,X").is_err());
    }

    #[test]
    fn dedup_keeps_first_seen_order_and_is_idempotent() {
        let raw = vec![
            Record::new("1", "J1", Tier::A1),
            Record::new("2", "J2", Tier::B1),
            Record::new("1", "J1", Tier::A1),
            Record::new("1", "J1", Tier::B2), // same ISSN, other tier: distinct
            Record::new("2", "J2", Tier::B1),
        ];
        let once = dedup_records(raw);
        assert_eq!(
            once,
            vec![
                Record::new("1", "J1", Tier::A1),
                Record::new("2", "J2", Tier::B1),
                Record::new("1", "J1", Tier::B2),
            ]
        );
        let twice = dedup_records(once.clone());
        assert_eq!(once, twice);
    }
}
