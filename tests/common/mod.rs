// tests/common/mod.rs
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use qualis_compare::core::net::{HttpResponse, Transport};
use qualis_compare::error::{QualisError, Result};

/// Replays canned responses in order and records every request it saw.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<HttpResponse>>>,
    pub requests: RefCell<Vec<(String, Option<String>)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, body: impl Into<String>) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse { body: body.into(), cookies: vec![] }));
        self
    }

    pub fn reply_with_cookie(self, body: impl Into<String>, cookie: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Ok(HttpResponse { body: body.into(), cookies: vec![cookie.to_string()] }));
        self
    }

    pub fn fail(self, msg: &str) -> Self {
        self.replies.borrow_mut().push_back(Err(QualisError::Fetch(msg.to_string())));
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str, cookie: Option<&str>) -> Result<HttpResponse> {
        self.requests.borrow_mut().push((url.to_string(), cookie.map(str::to_string)));
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(QualisError::Fetch(format!("unexpected request {url}"))))
    }
}

pub const LANDING_URL: &str = "https://report.test/lista.xhtml";

pub fn landing(token: &str) -> String {
    format!(
        r#"<html><form id="form"><input type="hidden" name="javax.faces.ViewState" id="javax.faces.ViewState" value="{token}" autocomplete="off" /></form></html>"#
    )
}

/// `rows` are (issn, title, tier); `summary` is (page_size, total).
pub fn results_page(rows: &[(&str, &str, &str)], summary: Option<(usize, usize)>) -> String {
    let mut body = String::from(r#"<div class="resultados"><table><thead><tr><th>ISSN</th><th>Título</th><th>Área</th><th>Estrato</th></tr></thead><tbody>"#);
    for (issn, title, tier) in rows {
        body.push_str(&format!("<tr><td>{issn}</td><td>{title}</td><td>MEDICINA II</td><td>{tier}</td></tr>"));
    }
    body.push_str("</tbody></table>");
    if let Some((size, total)) = summary {
        body.push_str(&format!("<ul><li>1 a {size} de {total} registro(s)</li></ul>"));
    }
    body.push_str("</div>");
    body
}

/// Partial-postback reply wrapping a results table.
pub fn partial_page(rows: &[(&str, &str, &str)]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><partial-response><changes><update id="form"><![CDATA[{}]]></update></changes></partial-response>"#,
        results_page(rows, None)
    )
}
