// Employment charts from the World Bank gender extract: time spent on
// unpaid work, and labor-force participation series.
use crate::charts::ChartContext;
use crate::error::Result;
use crate::output::{write_csv, write_wide_csv};
use crate::transforms::{pivot_wide, resolve_latest, PivotCell, WideTable};
use crate::types::{Observation, UnpaidWorkRow};
use std::cmp::Ordering;

/// Time spent on unpaid domestic and care work, % of a 24-hour day.
const UNPAID_MALE: &str = "SG.TIM.UWRK.MA";
const UNPAID_FEMALE: &str = "SG.TIM.UWRK.FE";

/// Labor force participation rate (% of population 15+), modeled ILO.
const LABOR_FEMALE: &str = "SL.TLF.CACT.FE.ZS";
const LABOR_MALE: &str = "SL.TLF.CACT.MA.ZS";

fn unpaid_sex(code: &str) -> Option<&'static str> {
    match code {
        UNPAID_MALE => Some("male"),
        UNPAID_FEMALE => Some("female"),
        _ => None,
    }
}

fn labor_sex(code: &str) -> Option<&'static str> {
    match code {
        LABOR_MALE => Some("male"),
        LABOR_FEMALE => Some("female"),
        _ => None,
    }
}

/// Latest share of the day spent on unpaid work per country and sex.
/// The published percent is rounded to a whole number while the derived
/// hours keep full precision; entities the classifier cannot name (regional
/// aggregates) are dropped.
pub fn chart_unpaid_work(ctx: &ChartContext) -> Result<usize> {
    let selected: Vec<Observation> = ctx
        .tables
        .gender
        .iter()
        .filter(|r| unpaid_sex(&r.indicator_code).is_some())
        .cloned()
        .collect();
    let latest = resolve_latest(
        selected,
        |r| r.value,
        |r| (r.indicator_code.clone(), r.entity_code.clone()),
        |r| r.year,
    );

    let mut rows = Vec::new();
    for r in latest {
        let Some(value) = r.value else { continue };
        let Some(sex) = unpaid_sex(&r.indicator_code) else {
            continue;
        };
        let Some(country) = ctx.classifier.name_short(&r.entity_code) else {
            continue;
        };
        rows.push(UnpaidWorkRow {
            year: r.year,
            country: country.to_string(),
            percent_of_day: value.round() as i64,
            sex: sex.to_string(),
            hours: value * 24.0 / 100.0,
        });
    }
    rows.sort_by(|a, b| {
        b.hours
            .partial_cmp(&a.hours)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.country.cmp(&b.country))
    });

    write_csv(&ctx.paths.out("unpaid_work.csv"), &rows)?;
    Ok(rows.len())
}

/// Full labor-force participation series for a set of entity codes,
/// pivoted to one column per sex. Time-series charts keep every year, so
/// no latest-value resolution happens here.
fn labor_force(ctx: &ChartContext, regions: &[&str]) -> Result<WideTable> {
    let cells: Vec<PivotCell> = ctx
        .tables
        .gender
        .iter()
        .filter(|r| regions.contains(&r.entity_code.as_str()) && r.value.is_some())
        .filter_map(|r| {
            let sex = labor_sex(&r.indicator_code)?;
            Some(PivotCell::new(
                vec![r.year.to_string(), r.entity_name.clone()],
                sex,
                r.value,
            ))
        })
        .collect();
    pivot_wide(
        vec!["year".to_string(), "entity_name".to_string()],
        cells,
        Some(vec!["female".to_string(), "male".to_string()]),
    )
}

pub fn chart_labor_force_world(ctx: &ChartContext) -> Result<usize> {
    let table = labor_force(ctx, &["WLD"])?;
    write_wide_csv(&ctx.paths.out("labor_force_world.csv"), &table)?;
    Ok(table.rows.len())
}

/// Labor force participation by income group. The World aggregate is left
/// out here; it has its own chart.
pub fn chart_labor_force_income(ctx: &ChartContext) -> Result<usize> {
    let table = labor_force(ctx, &["LIC", "LMC", "UMC", "HIC"])?;
    write_wide_csv(&ctx.paths.out("labor_force_income.csv"), &table)?;
    Ok(table.rows.len())
}
