// Charts built from the UNDP Human Development Report gender inequality
// index (GII) table: the explorer dataset, the binned distribution
// (ridgeline/histogram) charts, and the expected-schooling charts.
use crate::charts::ChartContext;
use crate::error::Result;
use crate::output::{write_csv, write_wide_csv};
use crate::transforms::{
    bin_and_count, pivot_wide, resolve_latest, BinDefinition, PivotCell, WideRow, WideTable,
};
use crate::types::{ConnectedDotRow, GiiExplorerRow, GiiRow};
use std::collections::BTreeMap;

const GII: &str = "gii";

/// Expected years of schooling, by sex.
const EDU_MALE: &str = "se_m";
const EDU_FEMALE: &str = "se_f";

/// The HDR's own code for the Sub-Saharan Africa aggregate row.
const SSA_AGGREGATE_CODE: &str = "ZZJ.SSA";
const SSA_NAME: &str = "Sub-Saharan Africa";

const INCOME_LEVELS: [&str; 4] = [
    "Low income",
    "Lower middle income",
    "Upper middle income",
    "High income",
];

const EDU_REGION_NAMES: [&str; 6] = [
    "Arab States",
    "East Asia and the Pacific",
    "Europe and Central Asia",
    "Latin America and the Caribbean",
    "South Asia",
    "Sub-Saharan Africa",
];

/// Latest value of one GII variable per country. Aggregate rows carry no
/// HDI tier code, which is what separates them from countries here.
fn latest_for_countries(rows: &[GiiRow], indicator: &str) -> Vec<GiiRow> {
    let countries: Vec<GiiRow> = rows
        .iter()
        .filter(|r| r.indicator == indicator && r.hdi_code.is_some())
        .cloned()
        .collect();
    resolve_latest(countries, |r| r.value, |r| r.iso3.clone(), |r| r.year)
}

/// Latest GII per country enriched with population, income level and
/// continent, feeding the explorer map and bubble plot.
pub fn chart_gii_explorer(ctx: &ChartContext) -> Result<usize> {
    let latest = latest_for_countries(&ctx.tables.gii, GII);

    let mut rows = Vec::new();
    for r in latest {
        let Some(value) = r.value else { continue };
        let Some(continent) = ctx.classifier.continent(&r.iso3) else {
            continue;
        };
        rows.push(GiiExplorerRow {
            country: r.country.clone(),
            iso3: r.iso3.clone(),
            year: r.year,
            value,
            population: ctx.population.get(&r.iso3).copied(),
            income_level: ctx.classifier.income_level(&r.iso3).map(str::to_string),
            continent: continent.to_string(),
        });
    }

    write_csv(&ctx.paths.out("hdr_gii_explorer.csv"), &rows)?;
    Ok(rows.len())
}

/// Bin GII values into the unit-interval bins and pivot counts wide, one
/// column per group value. The index carries both the representative x
/// value and the bin label, the layout the ridgeline charts consume.
fn histogram(
    rows: &[GiiRow],
    group: impl Fn(&GiiRow) -> Option<String>,
    keep_groups: Option<&[String]>,
) -> Result<WideTable> {
    let bins = BinDefinition::unit_interval();
    let counts = bin_and_count(rows, bins, |r| r.value, group, keep_groups);
    let cells = counts
        .into_iter()
        .map(|c| {
            let bin = &bins.bins()[c.bin_index];
            PivotCell::new(
                vec![bin.midpoint.to_string(), bin.label.clone()],
                c.group,
                Some(c.count as f64),
            )
        })
        .collect();
    pivot_wide(
        vec!["x_values".to_string(), "binned".to_string()],
        cells,
        keep_groups.map(|k| k.to_vec()),
    )
}

pub fn chart_histogram_continents(ctx: &ChartContext) -> Result<usize> {
    let latest = latest_for_countries(&ctx.tables.gii, GII);
    let table = histogram(
        &latest,
        |r| ctx.classifier.continent(&r.iso3).map(str::to_string),
        None,
    )?;
    write_wide_csv(&ctx.paths.out("hdr_gii_histogram_continents.csv"), &table)?;
    Ok(table.rows.len())
}

pub fn chart_histogram_income(ctx: &ChartContext) -> Result<usize> {
    let latest = latest_for_countries(&ctx.tables.gii, GII);
    let keep: Vec<String> = INCOME_LEVELS.iter().map(|s| s.to_string()).collect();
    let table = histogram(
        &latest,
        |r| ctx.classifier.income_level(&r.iso3).map(str::to_string),
        Some(keep.as_slice()),
    )?;
    write_wide_csv(&ctx.paths.out("hdr_gii_histogram_income.csv"), &table)?;
    Ok(table.rows.len())
}

/// Binned GII distribution per year, for Africa and for the world, joined
/// into one long table for the animated ridgeline.
pub fn chart_histogram_time_series(ctx: &ChartContext) -> Result<usize> {
    let bins = BinDefinition::unit_interval();
    let world: Vec<GiiRow> = ctx
        .tables
        .gii
        .iter()
        .filter(|r| r.indicator == GII && r.hdi_code.is_some())
        .cloned()
        .collect();
    let africa: Vec<GiiRow> = world
        .iter()
        .filter(|r| ctx.classifier.continent(&r.iso3) == Some("Africa"))
        .cloned()
        .collect();

    let africa_counts = bin_and_count(&africa, bins, |r| r.value, |r| Some(r.year), None);
    let world_counts = bin_and_count(&world, bins, |r| r.value, |r| Some(r.year), None);
    let world_map: BTreeMap<(usize, i32), u64> = world_counts
        .into_iter()
        .map(|c| ((c.bin_index, c.group), c.count))
        .collect();

    // Africa's years drive the output; the matching world count joins on.
    let rows = africa_counts
        .into_iter()
        .map(|c| {
            let bin = &bins.bins()[c.bin_index];
            WideRow {
                index: vec![
                    bin.midpoint.to_string(),
                    bin.label.clone(),
                    c.group.to_string(),
                ],
                values: vec![
                    Some(c.count as f64),
                    world_map.get(&(c.bin_index, c.group)).map(|n| *n as f64),
                ],
            }
        })
        .collect();
    let table = WideTable {
        index_columns: vec![
            "x_values".to_string(),
            "binned".to_string(),
            "year".to_string(),
        ],
        value_columns: vec!["Africa".to_string(), "World".to_string()],
        rows,
    };

    write_wide_csv(&ctx.paths.out("hdr_gii_histogram_time_series.csv"), &table)?;
    Ok(table.rows.len())
}

/// Latest expected-schooling values by sex for Sub-Saharan African
/// countries plus the SSA aggregate itself, as a connected-dot layout.
pub fn chart_education_connected_dot_ssa(ctx: &ChartContext) -> Result<usize> {
    let selected: Vec<GiiRow> = ctx
        .tables
        .gii
        .iter()
        .filter(|r| {
            (r.indicator == EDU_MALE || r.indicator == EDU_FEMALE)
                && (r.region_tag.as_deref() == Some("SSA") || r.country == SSA_NAME)
        })
        .cloned()
        .collect();
    let latest = resolve_latest(
        selected,
        |r| r.value,
        |r| (r.iso3.clone(), r.indicator.clone()),
        |r| r.year,
    );

    let mut rows = Vec::new();
    for r in latest {
        let Some(value) = r.value else { continue };
        let country = if r.iso3 == SSA_AGGREGATE_CODE {
            SSA_NAME.to_string()
        } else {
            match ctx.classifier.name_short(&r.iso3) {
                Some(name) => name.to_string(),
                None => continue,
            }
        };
        let sex = if r.indicator == EDU_MALE { "male" } else { "female" };
        rows.push(ConnectedDotRow {
            country,
            year: r.year,
            sex: sex.to_string(),
            value,
        });
    }

    write_csv(&ctx.paths.out("hdr_education_connected_dot_ssa.csv"), &rows)?;
    Ok(rows.len())
}

/// Expected-schooling time series for the HDR regions, one column per sex.
pub fn chart_education_regions_time_series(ctx: &ChartContext) -> Result<usize> {
    let cells: Vec<PivotCell> = ctx
        .tables
        .gii
        .iter()
        .filter(|r| {
            (r.indicator == EDU_MALE || r.indicator == EDU_FEMALE)
                && EDU_REGION_NAMES.contains(&r.country.as_str())
        })
        .map(|r| {
            let sex = if r.indicator == EDU_MALE { "male" } else { "female" };
            PivotCell::new(
                vec![r.country.clone(), r.year.to_string()],
                sex,
                r.value,
            )
        })
        .collect();
    let table = pivot_wide(
        vec!["region".to_string(), "year".to_string()],
        cells,
        Some(vec!["female".to_string(), "male".to_string()]),
    )?;

    write_wide_csv(
        &ctx.paths.out("hdr_education_regions_time_series.csv"),
        &table,
    )?;
    Ok(table.rows.len())
}
