// tests/report_client.rs
mod common;

use common::*;
use qualis_compare::error::QualisError;
use qualis_compare::progress::Progress;
use qualis_compare::record::{Record, Tier, TierSet};
use qualis_compare::remote::{ReportClient, SucupiraDialect};

fn client(t: &ScriptedTransport) -> ReportClient<&ScriptedTransport, SucupiraDialect> {
    ReportClient::new(t, SucupiraDialect::new(LANDING_URL, 16))
}

fn rows(prefix: &str, n: usize, tier: &str) -> Vec<(String, String, String)> {
    (0..n)
        .map(|i| (format!("{prefix}-{i:04}"), format!("Journal {prefix}{i}"), tier.to_string()))
        .collect()
}

fn as_refs(rows: &[(String, String, String)]) -> Vec<(&str, &str, &str)> {
    rows.iter().map(|(a, b, c)| (a.as_str(), b.as_str(), c.as_str())).collect()
}

#[test]
fn follows_pagination_with_same_selector_and_token() {
    let p1 = rows("1000", 20, "B1");
    let p2 = rows("2000", 20, "B1");
    let p3 = rows("3000", 17, "B1");
    let t = ScriptedTransport::new()
        .reply_with_cookie(landing("tok:1"), "JSESSIONID=abc; Path=/sucupira; HttpOnly")
        .reply(results_page(&as_refs(&p1), Some((20, 57))))
        .reply(partial_page(&as_refs(&p2)))
        .reply(partial_page(&as_refs(&p3)));

    let recs = client(&t).fetch(&TierSet::new(vec![Tier::B1]), None).unwrap();
    assert_eq!(recs.len(), 57);
    assert_eq!(t.remaining(), 0);

    let reqs = t.requests.borrow();
    assert_eq!(reqs.len(), 4, "landing + first page + exactly two follow-ups");
    assert_eq!(reqs[0].1, None);
    for (url, cookie) in &reqs[1..] {
        assert_eq!(cookie.as_deref(), Some("JSESSIONID=abc"));
        assert!(url.contains("form%3Aestrato=21"), "{url}");
        assert!(url.contains("javax.faces.ViewState=tok%3A1"), "{url}");
        assert!(url.contains("form%3Aarea=16"), "{url}");
    }
    assert!(reqs[1].0.contains("form%3Aconsultar=Consultar"));
    assert!(reqs[2].0.contains("form%3Aj_idt60%3Aj_idt67=1"));
    assert!(reqs[3].0.contains("form%3Aj_idt60%3Aj_idt67=2"));
    assert!(reqs[3].0.contains("javax.faces.partial.ajax=true"));
}

#[test]
fn tiers_get_consecutive_selectors_and_share_one_session() {
    let t = ScriptedTransport::new()
        .reply(landing("tok"))
        .reply(results_page(&[("1", "J1", "A1")], Some((50, 1))))
        .reply(results_page(&[("2", "J2", "A2")], Some((50, 1))));

    let recs = client(&t).fetch(&TierSet::new(vec![Tier::A1, Tier::A2]), None).unwrap();
    assert_eq!(recs, vec![Record::new("1", "J1", Tier::A1), Record::new("2", "J2", Tier::A2)]);

    let urls = t.urls();
    assert_eq!(urls.len(), 3);
    assert!(urls[1].contains("form%3Aestrato=21"));
    assert!(urls[2].contains("form%3Aestrato=22"));
}

#[test]
fn rebootstrap_per_tier_requests_landing_again() {
    let t = ScriptedTransport::new()
        .reply(landing("first"))
        .reply(results_page(&[("1", "J1", "A1")], Some((50, 1))))
        .reply(landing("second"))
        .reply(results_page(&[("2", "J2", "A2")], Some((50, 1))));

    let recs = client(&t)
        .with_rebootstrap_per_tier(true)
        .fetch(&TierSet::new(vec![Tier::A1, Tier::A2]), None)
        .unwrap();
    assert_eq!(recs.len(), 2);

    let urls = t.urls();
    assert_eq!(urls[0], LANDING_URL);
    assert_eq!(urls[2], LANDING_URL);
    assert!(urls[1].contains("ViewState=first"));
    assert!(urls[3].contains("ViewState=second"));
}

#[test]
fn missing_view_state_is_protocol_error() {
    let t = ScriptedTransport::new().reply("<html>Sistema em manutenção</html>");
    let err = client(&t).fetch(&TierSet::new(vec![Tier::A1]), None).unwrap_err();
    assert!(matches!(err, QualisError::Protocol(_)), "{err}");
    assert_eq!(t.requests.borrow().len(), 1);
}

#[test]
fn transport_failure_mid_fetch_aborts() {
    let t = ScriptedTransport::new()
        .reply(landing("tok"))
        .reply(results_page(&[("1", "J1", "B2")], Some((1, 3))))
        .reply(partial_page(&[("2", "J2", "B2")]))
        .fail("connection reset");

    let err = client(&t).fetch(&TierSet::new(vec![Tier::B2]), None).unwrap_err();
    assert!(matches!(err, QualisError::Fetch(ref m) if m.contains("connection reset")));
}

#[test]
fn empty_tier_yields_no_records_and_no_follow_ups() {
    let t = ScriptedTransport::new()
        .reply(landing("tok"))
        .reply("<div class=\"resultados\"><p>Nenhum registro encontrado</p></div>");

    let recs = client(&t).fetch(&TierSet::new(vec![Tier::B5]), None).unwrap();
    assert!(recs.is_empty());
    assert_eq!(t.requests.borrow().len(), 2);
}

#[test]
fn records_without_pagination_summary_abort_the_fetch() {
    let t = ScriptedTransport::new()
        .reply(landing("tok"))
        .reply(results_page(&[("1", "J1", "A1")], None));

    let err = client(&t).fetch(&TierSet::new(vec![Tier::A1]), None).unwrap_err();
    assert!(matches!(err, QualisError::Protocol(ref m) if m.contains("pagination")), "{err}");
    assert_eq!(t.requests.borrow().len(), 2);
}

#[test]
fn no_tiers_means_no_requests() {
    let t = ScriptedTransport::new();
    let recs = client(&t).fetch(&TierSet::new(vec![]), None).unwrap();
    assert!(recs.is_empty());
    assert!(t.requests.borrow().is_empty());
}

#[test]
fn repeated_rows_are_deduplicated_in_first_seen_order() {
    let t = ScriptedTransport::new()
        .reply(landing("tok"))
        .reply(results_page(&[("1", "J1", "C"), ("2", "J2", "C")], Some((2, 4))))
        .reply(partial_page(&[("2", "J2", "C"), ("3", "J3", "C")]));

    let recs = client(&t).fetch(&TierSet::new(vec![Tier::C]), None).unwrap();
    let issns: Vec<_> = recs.iter().map(|r| r.issn.as_str()).collect();
    assert_eq!(issns, ["1", "2", "3"]);
}

#[derive(Default)]
struct Recorder {
    begun: Option<usize>,
    done: Vec<(String, usize)>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.begun = Some(total); }
    fn item_done(&mut self, label: &str, records: usize) { self.done.push((label.to_string(), records)); }
    fn finish(&mut self) { self.finished = true; }
}

#[test]
fn progress_sees_each_tier_and_finish_even_on_error() {
    let t = ScriptedTransport::new()
        .reply(landing("tok"))
        .reply(results_page(&[("1", "J1", "A1"), ("2", "J2", "A1")], Some((50, 2))))
        .fail("timeout");

    let mut rec = Recorder::default();
    let res = client(&t).fetch(&TierSet::new(vec![Tier::A1, Tier::A2]), Some(&mut rec));
    assert!(res.is_err());
    assert_eq!(rec.begun, Some(2));
    assert_eq!(rec.done, vec![("A1".to_string(), 2)]);
    assert!(rec.finished);
}
