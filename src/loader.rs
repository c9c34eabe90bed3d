// Source-table loading. Each loader validates the headers it relies on
// (missing column -> SchemaError, fatal), normalizes rows into the typed
// structs in `types`, and reports what it skipped. Values stay optional;
// dropping missing values is the transforms' job, not the loader's.
use crate::config::Paths;
use crate::error::{Error, Result};
use crate::types::{
    GiiRow, MmrRow, Observation, PovertyRow, RawGiiRow, RawMmrRow, RawPovertyRow, RawUisRow,
    RawWbRow,
};
use crate::util::{clean_str, parse_f64_safe, parse_year_safe};
use csv::ReaderBuilder;
use std::path::Path;

/// Per-table diagnostics printed after loading.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: String,
    pub total_rows: usize,
    pub kept_rows: usize,
    pub parse_errors: usize,
}

/// Check that every required column is present, surfacing the first missing
/// one as a `SchemaError`.
pub fn ensure_columns(
    headers: &csv::StringRecord,
    table: &str,
    required: &[&str],
) -> Result<()> {
    for col in required {
        if !headers.iter().any(|h| h.trim() == *col) {
            return Err(Error::Schema {
                table: table.to_string(),
                column: col.to_string(),
            });
        }
    }
    Ok(())
}

/// Load a long-format World Bank extract (gender, law, WDI). The `date`
/// column may hold a full date or a plain year.
pub fn load_world_bank(path: &Path, table: &str) -> Result<(Vec<Observation>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    ensure_columns(
        rdr.headers()?,
        table,
        &["iso_code", "entity_name", "indicator_code", "date", "value"],
    )?;

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawWbRow>() {
        total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        let (Some(entity_code), Some(indicator_code), Some(year)) = (
            clean_str(raw.iso_code.as_deref()),
            clean_str(raw.indicator_code.as_deref()),
            parse_year_safe(raw.date.as_deref()),
        ) else {
            parse_errors += 1;
            continue;
        };
        rows.push(Observation {
            entity_name: clean_str(raw.entity_name.as_deref()).unwrap_or_else(|| entity_code.clone()),
            indicator_name: clean_str(raw.indicator_name.as_deref())
                .unwrap_or_else(|| indicator_code.clone()),
            entity_code,
            indicator_code,
            year,
            value: parse_f64_safe(raw.value.as_deref()),
        });
    }
    let report = LoadReport {
        table: table.to_string(),
        total_rows,
        kept_rows: rows.len(),
        parse_errors,
    };
    Ok((rows, report))
}

/// Load the UIS education extract, normalizing its upper-case headers onto
/// the same `Observation` shape as the World Bank tables.
pub fn load_uis(path: &Path) -> Result<(Vec<Observation>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    ensure_columns(
        rdr.headers()?,
        "uis",
        &["INDICATOR_ID", "COUNTRY_ID", "COUNTRY_NAME", "YEAR", "VALUE"],
    )?;

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawUisRow>() {
        total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        let (Some(entity_code), Some(indicator_code), Some(year)) = (
            clean_str(raw.country_id.as_deref()),
            clean_str(raw.indicator_id.as_deref()),
            parse_year_safe(raw.year.as_deref()),
        ) else {
            parse_errors += 1;
            continue;
        };
        rows.push(Observation {
            entity_name: clean_str(raw.country_name.as_deref())
                .unwrap_or_else(|| entity_code.clone()),
            indicator_name: indicator_code.clone(),
            entity_code,
            indicator_code,
            year,
            value: parse_f64_safe(raw.value.as_deref()),
        });
    }
    let report = LoadReport {
        table: "uis".to_string(),
        total_rows,
        kept_rows: rows.len(),
        parse_errors,
    };
    Ok((rows, report))
}

pub fn load_gii(path: &Path) -> Result<(Vec<GiiRow>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    ensure_columns(
        rdr.headers()?,
        "hdr_gii",
        &["iso3", "country", "variable", "year", "value"],
    )?;

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawGiiRow>() {
        total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        let (Some(iso3), Some(country), Some(indicator), Some(year)) = (
            clean_str(raw.iso3.as_deref()),
            clean_str(raw.country.as_deref()),
            clean_str(raw.variable.as_deref()),
            parse_year_safe(raw.year.as_deref()),
        ) else {
            parse_errors += 1;
            continue;
        };
        rows.push(GiiRow {
            iso3,
            country,
            indicator,
            year,
            value: parse_f64_safe(raw.value.as_deref()),
            hdi_code: clean_str(raw.hdicode.as_deref()),
            region_tag: clean_str(raw.region.as_deref()),
        });
    }
    let report = LoadReport {
        table: "hdr_gii".to_string(),
        total_rows,
        kept_rows: rows.len(),
        parse_errors,
    };
    Ok((rows, report))
}

/// Load an MMR estimates file. The country and region files differ only in
/// the entity column; `entity_column` names which one this file carries.
pub fn load_mmr(path: &Path, table: &str, entity_column: &str) -> Result<(Vec<MmrRow>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    ensure_columns(rdr.headers()?, table, &[entity_column, "parameter", "year", "value"])?;

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawMmrRow>() {
        total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        let entity = clean_str(raw.country.as_deref()).or_else(|| clean_str(raw.region.as_deref()));
        let (Some(entity), Some(parameter), Some(year)) = (
            entity,
            clean_str(raw.parameter.as_deref()),
            parse_year_safe(raw.year.as_deref()),
        ) else {
            parse_errors += 1;
            continue;
        };
        rows.push(MmrRow {
            entity,
            parameter,
            year,
            value: parse_f64_safe(raw.value.as_deref()),
        });
    }
    let report = LoadReport {
        table: table.to_string(),
        total_rows,
        kept_rows: rows.len(),
        parse_errors,
    };
    Ok((rows, report))
}

pub fn load_poverty(path: &Path) -> Result<(Vec<PovertyRow>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    ensure_columns(
        rdr.headers()?,
        "unwomen_pardee_poverty",
        &["region_name", "variable_code", "sex", "year", "value"],
    )?;

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawPovertyRow>() {
        total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        let (Some(region_name), Some(variable_code), Some(sex), Some(year)) = (
            clean_str(raw.region_name.as_deref()),
            clean_str(raw.variable_code.as_deref()),
            clean_str(raw.sex.as_deref()),
            parse_year_safe(raw.year.as_deref()),
        ) else {
            parse_errors += 1;
            continue;
        };
        rows.push(PovertyRow {
            region_name,
            variable_code,
            sex,
            year,
            value: parse_f64_safe(raw.value.as_deref()),
        });
    }
    let report = LoadReport {
        table: "unwomen_pardee_poverty".to_string(),
        total_rows,
        kept_rows: rows.len(),
        parse_errors,
    };
    Ok((rows, report))
}

/// Every source table a run needs, loaded once and shared read-only by all
/// chart builders.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub gender: Vec<Observation>,
    pub law: Vec<Observation>,
    pub wdi: Vec<Observation>,
    pub uis: Vec<Observation>,
    pub gii: Vec<GiiRow>,
    pub mmr_countries: Vec<MmrRow>,
    pub mmr_regions: Vec<MmrRow>,
    pub poverty: Vec<PovertyRow>,
}

pub fn load_all(paths: &Paths) -> Result<(SourceTables, Vec<LoadReport>)> {
    let mut reports = Vec::new();
    let (gender, r) = load_world_bank(&paths.raw("world_bank_gender.csv"), "world_bank_gender")?;
    reports.push(r);
    let (law, r) = load_world_bank(&paths.raw("world_bank_law.csv"), "world_bank_law")?;
    reports.push(r);
    let (wdi, r) = load_world_bank(&paths.raw("world_bank_wdi.csv"), "world_bank_wdi")?;
    reports.push(r);
    let (uis, r) = load_uis(&paths.raw("uis.csv"))?;
    reports.push(r);
    let (gii, r) = load_gii(&paths.raw("hdr_gii.csv"))?;
    reports.push(r);
    let (mmr_countries, r) = load_mmr(
        &paths.raw("mmr2020_country_estimates.csv"),
        "mmr2020_country_estimates",
        "country",
    )?;
    reports.push(r);
    let (mmr_regions, r) = load_mmr(
        &paths.raw("mmr2020_region_estimates.csv"),
        "mmr2020_region_estimates",
        "region",
    )?;
    reports.push(r);
    let (poverty, r) = load_poverty(&paths.raw("unwomen_pardee_poverty.csv"))?;
    reports.push(r);

    Ok((
        SourceTables {
            gender,
            law,
            wdi,
            uis,
            gii,
            mmr_countries,
            mmr_regions,
            poverty,
        },
        reports,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn world_bank_loader_normalizes_dates_and_counts_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world_bank_gender.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "iso_code,entity_name,indicator_code,indicator_name,date,value").unwrap();
        writeln!(f, "KEN,Kenya,SL.TLF.CACT.FE.ZS,Labor force,2020-01-01,72.5").unwrap();
        writeln!(f, "KEN,Kenya,SL.TLF.CACT.FE.ZS,Labor force,2021-01-01,").unwrap();
        writeln!(f, ",Kenya,SL.TLF.CACT.FE.ZS,Labor force,2022-01-01,70.0").unwrap();
        drop(f);

        let (rows, report) = load_world_bank(&path, "world_bank_gender").unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.kept_rows, 2);
        assert_eq!(report.parse_errors, 1);
        assert_eq!(rows[0].year, 2020);
        assert_eq!(rows[0].value, Some(72.5));
        // Missing value is kept as None, not treated as a parse error.
        assert_eq!(rows[1].value, None);
    }

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        std::fs::write(&path, "iso_code,entity_name,date,value\nKEN,Kenya,2020,1\n").unwrap();
        let err = load_world_bank(&path, "world_bank_gender").unwrap_err();
        assert!(matches!(err, Error::Schema { ref column, .. } if column == "indicator_code"));
    }

    #[test]
    fn mmr_loader_picks_the_right_entity_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mmr2020_region_estimates.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "region,parameter,year,value").unwrap();
        writeln!(f, "world,mmr,2020,223").unwrap();
        drop(f);

        let (rows, _) = load_mmr(&path, "mmr2020_region_estimates", "region").unwrap();
        assert_eq!(rows[0].entity, "world");

        let err = load_mmr(&path, "mmr2020_region_estimates", "country").unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }

    #[test]
    fn poverty_loader_trims_region_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unwomen_pardee_poverty.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "region_name,variable_code,sex,year,value").unwrap();
        writeln!(f, " Sub-Saharan Africa,POVCOUNT,Female,2019,254.3").unwrap();
        drop(f);

        let (rows, _) = load_poverty(&path).unwrap();
        assert_eq!(rows[0].region_name, "Sub-Saharan Africa");
    }
}
