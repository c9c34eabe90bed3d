// Maternal mortality charts from the UN MMEIG 2020 estimate files.
use crate::charts::ChartContext;
use crate::error::Result;
use crate::output::{write_csv, write_long_csv, write_wide_csv};
use crate::transforms::{pct_change_from_baseline, pivot_wide, PivotCell, WideRow, WideTable};
use crate::types::{MmrRow, PictogramRow};
use crate::util::round_to;

const MMR: &str = "mmr";
const MATERNAL_DEATHS: &str = "maternal_deaths_summation_of_country_estimates";

/// Countries shown on the change-since-2000 line chart.
const COUNTRY_LIST: [&str; 6] = [
    "Greece",
    "United States",
    "Ukraine",
    "Russia",
    "United Kingdom",
    "Portugal",
];

/// Regions shown next to them; the source spells the world row lowercase.
const REGION_LIST: [&str; 2] = ["Latin America and the Caribbean", "world"];

fn select_mmr(rows: &[MmrRow], entities: &[&str]) -> Vec<MmrRow> {
    rows.iter()
        .filter(|r| r.parameter == MMR && entities.contains(&r.entity.as_str()))
        .cloned()
        .collect()
}

fn change_cells(rows: &[MmrRow], rename: fn(&str) -> String) -> Vec<PivotCell> {
    let changes =
        pct_change_from_baseline(rows, 2000, |r| r.entity.clone(), |r| r.value, |r| r.year);
    rows.iter()
        .zip(changes)
        .map(|(r, change)| {
            PivotCell::new(vec![r.year.to_string()], rename(&r.entity), change)
        })
        .collect()
}

/// Percentage change in the maternal mortality ratio since 2000 for a fixed
/// set of countries and regions, one column per entity.
pub fn chart_line_change_in_mmr(ctx: &ChartContext) -> Result<usize> {
    let countries = select_mmr(&ctx.tables.mmr_countries, &COUNTRY_LIST);
    let regions = select_mmr(&ctx.tables.mmr_regions, &REGION_LIST);

    let mut cells = change_cells(&countries, |name| name.to_string());
    cells.extend(change_cells(&regions, |name| {
        // The front end labels the LAC region with its shorter name.
        if name == "Latin America and the Caribbean" {
            "Latin America".to_string()
        } else {
            name.to_string()
        }
    }));

    let mut column_order: Vec<String> = COUNTRY_LIST.iter().map(|s| s.to_string()).collect();
    column_order.push("Latin America".to_string());
    column_order.push("world".to_string());

    let table = pivot_wide(vec!["year".to_string()], cells, Some(column_order))?;
    write_wide_csv(&ctx.paths.out("mmr_line_change_in_mmr.csv"), &table)?;
    Ok(table.rows.len())
}

/// Total maternal deaths worldwide in 2020, for the pictogram.
pub fn chart_pictogram_world(ctx: &ChartContext) -> Result<usize> {
    let rows: Vec<PictogramRow> = ctx
        .tables
        .mmr_regions
        .iter()
        .filter(|r| r.parameter == MATERNAL_DEATHS && r.entity == "world" && r.year == 2020)
        .filter_map(|r| {
            Some(PictogramRow {
                region: "World".to_string(),
                year: r.year,
                value: round_to(r.value?, 0),
            })
        })
        .collect();

    write_csv(&ctx.paths.out("mmr_pictogram_world.csv"), &rows)?;
    Ok(rows.len())
}

/// 2020 maternal deaths split between Sub-Saharan Africa and the rest of
/// the world, melted long for the two-block pictogram.
pub fn chart_pictogram_ssa_rest_of_world(ctx: &ChartContext) -> Result<usize> {
    let cells: Vec<PivotCell> = ctx
        .tables
        .mmr_regions
        .iter()
        .filter(|r| {
            r.parameter == MATERNAL_DEATHS
                && r.year == 2020
                && (r.entity == "world" || r.entity == "Sub-Saharan Africa")
        })
        .map(|r| PivotCell::new(vec![r.year.to_string()], r.entity.clone(), r.value))
        .collect();
    let source = pivot_wide(vec!["year".to_string()], cells, None)?;

    let index = vec!["2020".to_string()];
    let ssa = source.cell(&index, "Sub-Saharan Africa");
    let world = source.cell(&index, "world");
    let rest = world.zip(ssa).map(|(w, s)| w - s);

    let table = WideTable {
        index_columns: vec!["year".to_string()],
        value_columns: vec![
            "Sub-Saharan Africa".to_string(),
            "Rest of the world".to_string(),
        ],
        rows: vec![WideRow {
            index,
            values: vec![ssa.map(|v| round_to(v, 0)), rest.map(|v| round_to(v, 0))],
        }],
    };
    let long = table.melt();

    write_long_csv(
        &ctx.paths.out("mmr_pictogram_ssa_rest_of_world.csv"),
        &["year"],
        "region",
        "value",
        &long,
    )?;
    Ok(long.len())
}
