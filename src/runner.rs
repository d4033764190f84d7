// src/runner.rs
//
// Pipeline steps as plain functions over option structs. Frontends (CLI, tests)
// decide which steps to run; nothing here reads global state.

use std::path::PathBuf;

use crate::{
    chart::{self, ChartGrid},
    compare::{build_mapping, cross_tabulate, mapping_tiers, CountMatrix},
    config::consts::{NEW_TIER_PREFIX, OLD_TIER_PREFIX},
    config::options::{CompareOptions, FetchOptions, ImportOptions},
    core::net::{HttpTransport, Transport},
    error::Result,
    import,
    progress::Progress,
    record::Record,
    remote::{ReportClient, SucupiraDialect},
    tsv,
};

/// What the compare step produced.
#[derive(Debug)]
pub struct CompareSummary {
    pub merged: PathBuf,
    pub charts: Vec<PathBuf>,
    pub matrix: CountMatrix,
}

/* ---------------- Import ---------------- */

/// PDF → records → `opts.out`.
pub fn import_pdf(opts: &ImportOptions) -> Result<Vec<Record>> {
    logf!("Importing data from {}", opts.pdf.display());
    let records = import::read_pdf(&opts.pdf, &opts.valid_tiers)?;
    tsv::save(&opts.out, &records, None)?;
    Ok(records)
}

/* ---------------- Fetch ---------------- */

/// Remote report → records → `opts.out`, over HTTP.
pub fn fetch_report(opts: &FetchOptions, progress: Option<&mut dyn Progress>) -> Result<Vec<Record>> {
    let transport = HttpTransport::new(opts.timeout, &opts.user_agent)?;
    fetch_with(transport, opts, progress)
}

/// Same as [`fetch_report`] over any transport.
pub fn fetch_with<T: Transport>(
    transport: T,
    opts: &FetchOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<Vec<Record>> {
    logf!("Fetching current Qualis data (area {}, tiers {:?})", opts.area, opts.tiers.labels());
    let client = ReportClient::new(transport, SucupiraDialect::new(opts.landing_url.clone(), opts.area))
        .with_base_selector(opts.base_selector)
        .with_rebootstrap_per_tier(opts.rebootstrap_per_tier);
    let records = client.fetch(&opts.tiers, progress)?;
    tsv::save(&opts.out, &records, None)?;
    Ok(records)
}

/* ---------------- Compare ---------------- */

/// Load both flat files, write the merged file and render both charts.
pub fn compare_files(opts: &CompareOptions) -> Result<CompareSummary> {
    let new = tsv::load(&opts.new_path)?;
    let old = tsv::load(&opts.old_path)?;
    compare_records(&new, &old, opts)
}

/// `new` supplies the mapping; `old` is annotated and cross-tabulated.
pub fn compare_records(new: &[Record], old: &[Record], opts: &CompareOptions) -> Result<CompareSummary> {
    let mapping = build_mapping(new);

    logf!("Adding new classification to old data...");
    tsv::save(&opts.merged_path, old, Some(&mapping))?;

    let matrix = cross_tabulate(old, &mapping, &opts.old_tiers, &mapping_tiers(new));
    let unmapped: u64 = matrix.unmapped().iter().sum();
    if unmapped > 0 {
        logf!("{unmapped} journals of the current list are absent from the new one");
    }

    logf!("Plotting data...");
    chart::render(
        &ChartGrid::by_mapping_tier(&matrix, NEW_TIER_PREFIX, opts.columns),
        &opts.chart_path,
    )?;
    chart::render(
        &ChartGrid::by_subject_tier(&matrix, OLD_TIER_PREFIX, opts.columns),
        &opts.chart_by_old_path,
    )?;

    Ok(CompareSummary {
        merged: opts.merged_path.clone(),
        charts: vec![opts.chart_path.clone(), opts.chart_by_old_path.clone()],
        matrix,
    })
}

/* ---------------- Everything ---------------- */

/// Import, fetch, then compare what was just written.
pub fn run_all(
    import_opts: &ImportOptions,
    fetch_opts: &FetchOptions,
    compare_opts: &CompareOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<CompareSummary> {
    let new = import_pdf(import_opts)?;
    let old = fetch_report(fetch_opts, progress)?;
    compare_records(&new, &old, compare_opts)
}
