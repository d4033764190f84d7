// src/progress.rs
//
// Status callbacks for the remote fetch, which is the only slow step.

/// Implemented by frontends; every hook defaults to doing nothing.
pub trait Progress {
    /// Number of tiers about to be fetched.
    fn begin(&mut self, _total: usize) {}

    /// Human-readable status, e.g. the page being requested.
    fn log(&mut self, _msg: &str) {}

    /// Every page of tier `label` is in; `records` rows were read.
    fn item_done(&mut self, _label: &str, _records: usize) {}

    /// Runs once at the end whether the fetch succeeded or not.
    fn finish(&mut self) {}
}
