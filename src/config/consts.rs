// src/config/consts.rs

// Net config
pub const LANDING_URL: &str = "https://sucupira.capes.gov.br/sucupira/public/consultas/coleta/veiculoPublicacaoQualis/listaConsultaGeralPeriodicos.xhtml";
pub const USER_AGENT: &str = concat!("qualis_compare/", env!("CARGO_PKG_VERSION"));
pub const TIMEOUT_SECS: u64 = 30;

// Report form
pub const DEFAULT_AREA: u32 = 16; // MEDICINA II
pub const BASE_SELECTOR: u32 = 21; // form:estrato value of the first requested tier

// Files
pub const DEFAULT_NEW_FILE: &str = "novo_qualis.tsv";
pub const DEFAULT_OLD_FILE: &str = "medicina_II.tsv";
pub const DEFAULT_MERGED_FILE: &str = "medicina_II_plusNew.tsv";
pub const DEFAULT_CHART_FILE: &str = "qualis_comparison.svg";
pub const DEFAULT_CHART_BY_OLD_FILE: &str = "qualis_comparison_by_old.svg";

// Charts
pub const CHART_COLUMNS: usize = 2;
pub const NEW_TIER_PREFIX: &str = "Novo_";
pub const OLD_TIER_PREFIX: &str = "Atual_";
