// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;
use crate::record::TierSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub landing_url: String,
    pub area: u32,
    pub base_selector: u32,
    pub tiers: TierSet,
    pub timeout: Duration,
    pub rebootstrap_per_tier: bool,
    pub user_agent: String,
    pub out: PathBuf,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            landing_url: s!(LANDING_URL),
            area: DEFAULT_AREA,
            base_selector: BASE_SELECTOR,
            tiers: TierSet::qualis_legacy(),
            timeout: Duration::from_secs(TIMEOUT_SECS),
            rebootstrap_per_tier: false,
            user_agent: s!(USER_AGENT),
            out: PathBuf::from(DEFAULT_OLD_FILE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportOptions {
    pub pdf: PathBuf,
    pub valid_tiers: TierSet,
    pub out: PathBuf,
}

impl ImportOptions {
    pub fn new(pdf: impl Into<PathBuf>) -> Self {
        Self {
            pdf: pdf.into(),
            valid_tiers: TierSet::qualis_2019(),
            out: PathBuf::from(DEFAULT_NEW_FILE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompareOptions {
    pub new_path: PathBuf,
    pub old_path: PathBuf,
    pub merged_path: PathBuf,
    pub chart_path: PathBuf,
    pub chart_by_old_path: PathBuf,
    pub old_tiers: TierSet,
    pub columns: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            new_path: PathBuf::from(DEFAULT_NEW_FILE),
            old_path: PathBuf::from(DEFAULT_OLD_FILE),
            merged_path: PathBuf::from(DEFAULT_MERGED_FILE),
            chart_path: PathBuf::from(DEFAULT_CHART_FILE),
            chart_by_old_path: PathBuf::from(DEFAULT_CHART_BY_OLD_FILE),
            old_tiers: TierSet::qualis_legacy(),
            columns: CHART_COLUMNS,
        }
    }
}
