// Education charts built from the UIS extract.
use crate::charts::ChartContext;
use crate::error::Result;
use crate::output::write_csv;
use crate::transforms::resolve_latest;
use crate::types::{AttainmentScatterRow, Observation};

/// Educational attainment gender parity index (completed primary or
/// higher, population 25+).
const ATTAINMENT_GPI: &str = "EA.1T8.AG25T99.GPIA";

/// Scatter of the latest attainment gender parity index per country against
/// GDP per capita, colored by continent. Countries missing either
/// enrichment are dropped, and only observations from 2015 onwards are
/// recent enough to plot.
pub fn chart_scatter_attainment(ctx: &ChartContext) -> Result<usize> {
    let selected: Vec<Observation> = ctx
        .tables
        .uis
        .iter()
        .filter(|r| r.indicator_code == ATTAINMENT_GPI)
        .cloned()
        .collect();
    let latest = resolve_latest(
        selected,
        |r| r.value,
        |r| r.entity_code.clone(),
        |r| r.year,
    );

    let mut rows = Vec::new();
    for r in latest {
        if r.year < 2015 {
            continue;
        }
        let Some(value) = r.value else { continue };
        let Some(continent) = ctx.classifier.continent(&r.entity_code) else {
            continue;
        };
        let Some(gdp) = ctx.gdp_per_capita.get(&r.entity_code) else {
            continue;
        };
        rows.push(AttainmentScatterRow {
            iso_code: r.entity_code.clone(),
            country: r.entity_name.clone(),
            year: r.year,
            gender_parity_index: value,
            continent: continent.to_string(),
            gdp_per_capita: *gdp,
        });
    }

    write_csv(&ctx.paths.out("education_attainment_scatter.csv"), &rows)?;
    Ok(rows.len())
}
