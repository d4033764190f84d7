// src/remote/dialect.rs
//
// Request builder + response parser for one version of the remote report.
// When the portal's markup or form ids change, a new dialect is written and
// the client stays as is.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::config::consts::{DEFAULT_AREA, LANDING_URL};
use crate::error::{QualisError, Result};
use crate::record::Record;

use super::table;

/// "1 a <page_size> de <total> registro(s)" as reported under the results table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: usize,
    pub total: usize,
}

impl Pagination {
    /// `ceil(total / page_size)`; `page_size` is non-zero by construction.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }
}

/// Query parameters as (name, value) pairs, in the order they are sent.
pub type Params = Vec<(&'static str, String)>;

pub trait ReportDialect {
    /// Tag identifying the markup/form generation this dialect speaks.
    fn version(&self) -> &'static str;

    fn landing_url(&self) -> &str;

    /// Parameters of the full-page request selecting one tier.
    fn first_page_params(&self, selector: u32, view_state: &str) -> Params;

    /// Parameters of the partial-postback request for page `page_index` (0-based).
    fn next_page_params(&self, selector: u32, page_index: usize, view_state: &str) -> Params;

    /// View-state token of the landing page. Missing token is a protocol error.
    fn view_state(&self, body: &str) -> Result<String>;

    /// Pagination summary of a first page, if the page shows one.
    fn pagination(&self, body: &str) -> Result<Option<Pagination>>;

    /// Records of the embedded results table; empty when there is no table.
    fn records(&self, body: &str) -> Vec<Record> {
        table::parse_results(body)
    }

    /// Landing URL with `params` appended as an urlencoded query string.
    fn request_url(&self, params: &Params) -> Result<String> {
        let url = Url::parse_with_params(self.landing_url(), params.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|e| QualisError::Fetch(format!("invalid report URL {}: {e}", self.landing_url())))?;
        Ok(url.into())
    }
}

/// `<input type="hidden" name="javax.faces.ViewState" id="..." value="TOKEN" .../>`
static VIEW_STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"name="javax\.faces\.ViewState"[^>]*?\bvalue="([^"]*)""#).expect("view-state pattern")
});

/// `<li>1 a 50 de 1234 registro(s)</li>`
static PAGINATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[>\s])1\s+a\s+(\d+)\s+de\s+(\d+)\s+registro\(s\)").expect("pagination pattern")
});

/// Sucupira "Consulta Geral de Periódicos" as served in 2019 (JSF 2 + RichFaces).
#[derive(Clone, Debug)]
pub struct SucupiraDialect {
    landing_url: String,
    area: u32,
}

impl Default for SucupiraDialect {
    fn default() -> Self {
        Self::new(LANDING_URL, DEFAULT_AREA)
    }
}

impl SucupiraDialect {
    pub const VERSION: &'static str = "sucupira-jsf-2019";

    pub fn new(landing_url: impl Into<String>, area: u32) -> Self {
        Self { landing_url: landing_url.into(), area }
    }

    /// Form fields every request repeats: area filter on, ISSN filter empty.
    fn selection(&self, selector: u32) -> Params {
        vec![
            ("form", s!("form")),
            ("form:evento", s!("156")),
            ("form:checkArea", s!("on")),
            ("form:area", self.area.to_string()),
            ("form:issn:issn", s!()),
            ("form:j_idt49", s!()),
            ("form:checkEstrato", s!("on")),
            ("form:estrato", selector.to_string()),
        ]
    }
}

impl ReportDialect for SucupiraDialect {
    fn version(&self) -> &'static str { Self::VERSION }

    fn landing_url(&self) -> &str { &self.landing_url }

    fn first_page_params(&self, selector: u32, view_state: &str) -> Params {
        let mut p = self.selection(selector);
        p.push(("form:consultar", s!("Consultar")));
        p.push(("javax.faces.ViewState", s!(view_state)));
        p
    }

    fn next_page_params(&self, selector: u32, page_index: usize, view_state: &str) -> Params {
        const NEXT_BUTTON: &str = "form:j_idt60:botaoProxPagina";

        let mut p = self.selection(selector);
        p.extend([
            ("form:j_idt60:j_idt67", page_index.to_string()),
            ("javax.faces.ViewState", s!(view_state)),
            ("javax.faces.source", s!(NEXT_BUTTON)),
            ("javax.faces.partial.event", s!("click")),
            ("javax.faces.partial.execute", join!(NEXT_BUTTON, " @component")),
            ("javax.faces.partial.render", s!("@component")),
            ("javax.faces.behavior.event", s!("action")),
            ("org.richfaces.ajax.component", s!(NEXT_BUTTON)),
            ("AJAX:EVENTS_COUNT", s!("1")),
            ("javax.faces.partial.ajax", s!("true")),
        ]);
        p
    }

    fn view_state(&self, body: &str) -> Result<String> {
        VIEW_STATE_RE
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                QualisError::Protocol(format!(
                    "view-state token not found on landing page ({})",
                    self.version()
                ))
            })
    }

    fn pagination(&self, body: &str) -> Result<Option<Pagination>> {
        let Some(caps) = PAGINATION_RE.captures(body) else {
            return Ok(None);
        };
        let num = |i: usize| -> Result<usize> {
            caps[i]
                .parse::<usize>()
                .map_err(|e| qerr!(Protocol, "bad pagination number {:?}: {e}", &caps[i]))
        };
        let page_size = num(1)?;
        let total = num(2)?;
        if page_size == 0 {
            return Err(QualisError::Protocol(s!("pagination reports a page size of 0")));
        }
        Ok(Some(Pagination { page_size, total }))
    }
}
