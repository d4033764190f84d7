// src/remote/mod.rs
//! # Remote report
//!
//! Reconstructs the paginated "Consulta Geral de Periódicos" report.
//!
//! - [`dialect`]: request builder + response parser for one generation of the
//!   portal's markup. Wire contracts (view-state token, pagination summary)
//!   are regexes documented there.
//! - [`table`]: the embedded results table → `Record`s.
//! - [`client`]: session bootstrap, per-tier paging, deduplication.
//!
//! ```text
//! ReportClient::fetch(tiers)
//!   └─ bootstrap ─ GET landing → cookie + view-state
//!   └─ per tier  ─ GET first page (selector, token) → records + page count
//!                └ GET page 1..n (partial postback)  → records
//!   └─ dedup
//! ```

pub mod client;
pub mod dialect;
pub mod table;

pub use client::ReportClient;
pub use dialect::{Pagination, ReportDialect, SucupiraDialect};
