// src/remote/client.rs
//
// Drives the report's paging protocol: bootstrap a session, then for every
// tier request the first page, derive the page count from its summary and
// replay the partial-postback request for each remaining page.
// Strictly sequential: later pages reuse the selector and token of the first.

use crate::config::consts::BASE_SELECTOR;
use crate::core::net::{cookie_header, Transport};
use crate::error::Result;
use crate::progress::Progress;
use crate::record::{dedup_records, Record, Tier, TierSet};

use super::dialect::{Params, ReportDialect};

/// Cookie + view-state token of one fetch. Never outlives the `fetch` call.
#[derive(Clone, Debug)]
struct Session {
    cookie: Option<String>,
    view_state: String,
}

/// Numeric value the form uses for the tier at `index` of the requested list.
pub fn selector_for(base: u32, index: usize) -> u32 {
    base + index as u32
}

pub struct ReportClient<T: Transport, D: ReportDialect> {
    transport: T,
    dialect: D,
    base_selector: u32,
    rebootstrap_per_tier: bool,
}

impl<T: Transport, D: ReportDialect> ReportClient<T, D> {
    pub fn new(transport: T, dialect: D) -> Self {
        Self {
            transport,
            dialect,
            base_selector: BASE_SELECTOR,
            rebootstrap_per_tier: false,
        }
    }

    pub fn with_base_selector(mut self, base: u32) -> Self {
        self.base_selector = base;
        self
    }

    /// Start a fresh session (and token) for every tier instead of one per fetch.
    pub fn with_rebootstrap_per_tier(mut self, on: bool) -> Self {
        self.rebootstrap_per_tier = on;
        self
    }

    /// Every record the report lists for `tiers`, deduplicated, first-seen order.
    /// Any failed request aborts the whole fetch; nothing partial is returned.
    pub fn fetch(
        &self,
        tiers: &TierSet,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<Vec<Record>> {
        if let Some(p) = progress.as_deref_mut() {
            p.begin(tiers.len());
        }
        let result = self.fetch_all(tiers, progress.as_deref_mut());
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }

        let records = dedup_records(result?);
        logf!("Fetched {} records.", records.len());
        Ok(records)
    }

    fn fetch_all<'p>(
        &self,
        tiers: &TierSet,
        mut progress: Option<&mut (dyn Progress + 'p)>,
    ) -> Result<Vec<Record>> {
        if tiers.is_empty() {
            return Ok(Vec::new());
        }
        logd!("Report dialect {}", self.dialect.version());

        let mut session = self.bootstrap()?;
        let mut all = Vec::new();

        for (index, tier) in tiers.iter().enumerate() {
            if index > 0 && self.rebootstrap_per_tier {
                session = self.bootstrap()?;
            }
            let selector = selector_for(self.base_selector, index);
            let records = self.fetch_tier(&session, tier, selector, progress.as_deref_mut())?;
            if let Some(p) = progress.as_deref_mut() {
                p.item_done(tier.label(), records.len());
            }
            all.extend(records);
        }
        Ok(all)
    }

    fn bootstrap(&self) -> Result<Session> {
        let landing = self.dialect.landing_url();
        logd!("Bootstrapping session at {landing}");
        let resp = self.transport.get(landing, None)?;
        let view_state = self.dialect.view_state(&resp.body)?;
        let cookie = cookie_header(&resp.cookies);
        if cookie.is_none() {
            logw!("Landing page set no session cookie");
        }
        Ok(Session { cookie, view_state })
    }

    fn fetch_tier<'p>(
        &self,
        session: &Session,
        tier: Tier,
        selector: u32,
        mut progress: Option<&mut (dyn Progress + 'p)>,
    ) -> Result<Vec<Record>> {
        logf!("Loading data for Qualis {tier}");
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Qualis {tier}: page 1"));
        }

        let first = self.get(session, &self.dialect.first_page_params(selector, &session.view_state))?;
        let mut records = self.dialect.records(&first);

        let pages = match self.dialect.pagination(&first)? {
            Some(p) => p.page_count(),
            None if records.is_empty() => 0,
            None => {
                return Err(qerr!(
                    Protocol,
                    "Qualis {tier}: first page lists {} records but no pagination summary ({})",
                    records.len(),
                    self.dialect.version()
                ));
            }
        };
        if records.is_empty() {
            logf!("Qualis {tier}: found no records");
        }

        for page in 1..pages {
            logd!("Loading page {} of {pages}", page + 1);
            if let Some(p) = progress.as_deref_mut() {
                p.log(&format!("Qualis {tier}: page {} of {pages}", page + 1));
            }
            let body = self.get(session, &self.dialect.next_page_params(selector, page, &session.view_state))?;
            records.extend(self.dialect.records(&body));
        }
        Ok(records)
    }

    fn get(&self, session: &Session, params: &Params) -> Result<String> {
        let url = self.dialect.request_url(params)?;
        Ok(self.transport.get(&url, session.cookie.as_deref())?.body)
    }
}
