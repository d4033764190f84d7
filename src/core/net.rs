// src/core/net.rs
//
// Blocking HTTP GET. Cookies are not stored by the client: callers own the
// session and pass the `Cookie` header explicitly on each request.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{COOKIE, SET_COOKIE};

use crate::error::Result;

/// Status-checked response: body text plus `name=value` pairs from `Set-Cookie`.
#[derive(Clone, Debug, Default)]
pub struct HttpResponse {
    pub body: String,
    pub cookies: Vec<String>,
}

/// One blocking GET. Any transport failure is a `QualisError::Fetch`.
pub trait Transport {
    fn get(&self, url: &str, cookie: Option<&str>) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, cookie: Option<&str>) -> Result<HttpResponse> {
        (**self).get(url, cookie)
    }
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, cookie: Option<&str>) -> Result<HttpResponse> {
        let mut req = self.client.get(url);
        if let Some(c) = cookie {
            req = req.header(COOKIE, c);
        }
        let resp = req.send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(qerr!(Fetch, "HTTP error: {status} {url}"));
        }

        let cookies = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(cookie_pair)
            .collect();
        let body = resp.text()?;
        Ok(HttpResponse { body, cookies })
    }
}

/// `JSESSIONID=abc; Path=/; HttpOnly` → `JSESSIONID=abc`
pub fn cookie_pair(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?.trim();
    if pair.contains('=') && !pair.starts_with('=') {
        Some(pair.to_string())
    } else {
        None
    }
}

/// Fold `name=value` pairs into one `Cookie` header value. Later pairs replace
/// earlier ones with the same name.
pub fn cookie_header(pairs: &[String]) -> Option<String> {
    let mut kept: Vec<&str> = Vec::with_capacity(pairs.len());
    for p in pairs {
        let name = p.split('=').next().unwrap_or("");
        kept.retain(|k| k.split('=').next().unwrap_or("") != name);
        kept.push(p);
    }
    if kept.is_empty() { None } else { Some(kept.join("; ")) }
}
