use serde::{Deserialize, Serialize};
use tabled::Tabled;

// ---------------------------------------------------------------------------
// Raw rows, deserialized straight out of the source CSVs. Every field is an
// optional string; the loader turns these into the typed rows below and
// counts anything unusable as a parse error.
// ---------------------------------------------------------------------------

/// Long-format World Bank extract row (gender, law and WDI tables share
/// this schema). The UIS education extract uses the same shape with
/// upper-case headers, handled by its own raw struct below.
#[derive(Debug, Deserialize)]
pub struct RawWbRow {
    #[serde(rename = "iso_code")]
    pub iso_code: Option<String>,
    #[serde(rename = "entity_name")]
    pub entity_name: Option<String>,
    #[serde(rename = "indicator_code")]
    pub indicator_code: Option<String>,
    #[serde(rename = "indicator_name")]
    pub indicator_name: Option<String>,
    #[serde(rename = "date")]
    pub date: Option<String>,
    #[serde(rename = "value")]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawUisRow {
    #[serde(rename = "INDICATOR_ID")]
    pub indicator_id: Option<String>,
    #[serde(rename = "COUNTRY_ID")]
    pub country_id: Option<String>,
    #[serde(rename = "COUNTRY_NAME")]
    pub country_name: Option<String>,
    #[serde(rename = "YEAR")]
    pub year: Option<String>,
    #[serde(rename = "VALUE")]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawGiiRow {
    #[serde(rename = "iso3")]
    pub iso3: Option<String>,
    #[serde(rename = "country")]
    pub country: Option<String>,
    #[serde(rename = "variable")]
    pub variable: Option<String>,
    #[serde(rename = "year")]
    pub year: Option<String>,
    #[serde(rename = "value")]
    pub value: Option<String>,
    #[serde(rename = "hdicode")]
    pub hdicode: Option<String>,
    #[serde(rename = "region")]
    pub region: Option<String>,
}

/// The MMR country and region estimate files share a schema except for the
/// entity column name (`country` vs `region`); one raw struct covers both.
#[derive(Debug, Deserialize)]
pub struct RawMmrRow {
    #[serde(rename = "country")]
    pub country: Option<String>,
    #[serde(rename = "region")]
    pub region: Option<String>,
    #[serde(rename = "parameter")]
    pub parameter: Option<String>,
    #[serde(rename = "year")]
    pub year: Option<String>,
    #[serde(rename = "value")]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawPovertyRow {
    #[serde(rename = "region_name")]
    pub region_name: Option<String>,
    #[serde(rename = "variable_code")]
    pub variable_code: Option<String>,
    #[serde(rename = "sex")]
    pub sex: Option<String>,
    #[serde(rename = "year")]
    pub year: Option<String>,
    #[serde(rename = "value")]
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Typed rows the transform primitives operate on.
// ---------------------------------------------------------------------------

/// One normalized long-format fact: entity x indicator x year -> value.
/// Identity is the (entity, indicator, year) tuple; `value` stays optional
/// because missing observations are meaningful to the latest-value resolver.
#[derive(Debug, Clone)]
pub struct Observation {
    pub entity_code: String,
    pub entity_name: String,
    pub indicator_code: String,
    pub indicator_name: String,
    pub year: i32,
    pub value: Option<f64>,
}

/// HDR Gender Inequality Index row. Carries the HDI tier code (countries
/// only) and the source's own region tag, both used as filters.
#[derive(Debug, Clone)]
pub struct GiiRow {
    pub iso3: String,
    pub country: String,
    pub indicator: String,
    pub year: i32,
    pub value: Option<f64>,
    pub hdi_code: Option<String>,
    pub region_tag: Option<String>,
}

/// Maternal mortality estimate row (country or region level).
#[derive(Debug, Clone)]
pub struct MmrRow {
    pub entity: String,
    pub parameter: String,
    pub year: i32,
    pub value: Option<f64>,
}

/// UN Women / Pardee poverty projection row, split by sex.
#[derive(Debug, Clone)]
pub struct PovertyRow {
    pub region_name: String,
    pub variable_code: String,
    pub sex: String,
    pub year: i32,
    pub value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Fixed-schema chart output rows. Pivoted charts with data-dependent columns
// go through `transforms::WideTable` instead.
// ---------------------------------------------------------------------------

pub fn display_opt_f64(v: &Option<f64>) -> String {
    match v {
        Some(x) => x.to_string(),
        None => String::new(),
    }
}

pub fn display_opt_str(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct GiiExplorerRow {
    #[serde(rename = "country")]
    #[tabled(rename = "country")]
    pub country: String,
    #[serde(rename = "iso3")]
    #[tabled(rename = "iso3")]
    pub iso3: String,
    #[serde(rename = "year")]
    #[tabled(rename = "year")]
    pub year: i32,
    #[serde(rename = "value")]
    #[tabled(rename = "value")]
    pub value: f64,
    #[serde(rename = "population")]
    #[tabled(rename = "population", display_with = "display_opt_f64")]
    pub population: Option<f64>,
    #[serde(rename = "income_level")]
    #[tabled(rename = "income_level", display_with = "display_opt_str")]
    pub income_level: Option<String>,
    #[serde(rename = "continent")]
    #[tabled(rename = "continent")]
    pub continent: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AttainmentScatterRow {
    #[serde(rename = "iso_code")]
    #[tabled(rename = "iso_code")]
    pub iso_code: String,
    #[serde(rename = "country")]
    #[tabled(rename = "country")]
    pub country: String,
    #[serde(rename = "year")]
    #[tabled(rename = "year")]
    pub year: i32,
    #[serde(rename = "gender_parity_index")]
    #[tabled(rename = "gender_parity_index")]
    pub gender_parity_index: f64,
    #[serde(rename = "continent")]
    #[tabled(rename = "continent")]
    pub continent: String,
    #[serde(rename = "gdp_per_capita")]
    #[tabled(rename = "gdp_per_capita")]
    pub gdp_per_capita: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ConnectedDotRow {
    #[serde(rename = "country")]
    #[tabled(rename = "country")]
    pub country: String,
    #[serde(rename = "year")]
    #[tabled(rename = "year")]
    pub year: i32,
    #[serde(rename = "sex")]
    #[tabled(rename = "sex")]
    pub sex: String,
    #[serde(rename = "value")]
    #[tabled(rename = "value")]
    pub value: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct UnpaidWorkRow {
    #[serde(rename = "year")]
    #[tabled(rename = "year")]
    pub year: i32,
    #[serde(rename = "country")]
    #[tabled(rename = "country")]
    pub country: String,
    #[serde(rename = "percent_of_day")]
    #[tabled(rename = "percent_of_day")]
    pub percent_of_day: i64,
    #[serde(rename = "sex")]
    #[tabled(rename = "sex")]
    pub sex: String,
    #[serde(rename = "hours")]
    #[tabled(rename = "hours")]
    pub hours: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MarimekkoRow {
    #[serde(rename = "indicator_name")]
    #[tabled(rename = "indicator_name")]
    pub indicator_name: String,
    #[serde(rename = "entity_name")]
    #[tabled(rename = "entity_name")]
    pub entity_name: String,
    #[serde(rename = "year")]
    #[tabled(rename = "year")]
    pub year: i32,
    #[serde(rename = "value_label")]
    #[tabled(rename = "value_label")]
    pub value_label: String,
    #[serde(rename = "value")]
    #[tabled(rename = "value")]
    pub value: i64,
    #[serde(rename = "female_pop")]
    #[tabled(rename = "female_pop")]
    pub female_pop: f64,
    #[serde(rename = "width")]
    #[tabled(rename = "width")]
    pub width: f64,
    #[serde(rename = "female_pop_annot")]
    #[tabled(rename = "female_pop_annot")]
    pub female_pop_annot: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BeeswarmRow {
    #[serde(rename = "continent")]
    #[tabled(rename = "continent")]
    pub continent: String,
    #[serde(rename = "value")]
    #[tabled(rename = "value")]
    pub value: f64,
    #[serde(rename = "income_level")]
    #[tabled(rename = "income_level", display_with = "display_opt_str")]
    pub income_level: Option<String>,
    #[serde(rename = "entity_name")]
    #[tabled(rename = "entity_name")]
    pub entity_name: String,
    #[serde(rename = "year")]
    #[tabled(rename = "year")]
    pub year: i32,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PictogramRow {
    #[serde(rename = "region")]
    #[tabled(rename = "region")]
    pub region: String,
    #[serde(rename = "year")]
    #[tabled(rename = "year")]
    pub year: i32,
    #[serde(rename = "value")]
    #[tabled(rename = "value")]
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Run summary, written as JSON next to the chart outputs.
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ChartStatus {
    #[tabled(rename = "chart")]
    pub chart: String,
    #[tabled(rename = "rows", display_with = "display_status_rows")]
    pub rows: Option<usize>,
    #[tabled(rename = "status")]
    pub status: String,
}

pub fn display_status_rows(v: &Option<usize>) -> String {
    match v {
        Some(n) => n.to_string(),
        None => "-".to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub charts_total: usize,
    pub charts_succeeded: usize,
    pub charts_failed: usize,
    pub charts: Vec<ChartStatus>,
}
