// Poverty charts from the UN Women / Pardee Center projections. All of
// them look at women in extreme poverty (POVCOUNT, in millions).
use crate::charts::ChartContext;
use crate::error::Result;
use crate::output::{fmt_cell, write_wide_csv};
use crate::transforms::{pct_change_from_baseline, pivot_wide, PivotCell};
use crate::types::PovertyRow;

const POVERTY_COUNT: &str = "POVCOUNT";
const BASELINE_YEAR: i32 = 2019;

fn female_povcount<'a>(
    rows: &'a [PovertyRow],
    regions: &'a [&str],
) -> impl Iterator<Item = &'a PovertyRow> + 'a {
    rows.iter().filter(move |r| {
        r.variable_code == POVERTY_COUNT
            && r.sex == "Female"
            && regions.contains(&r.region_name.as_str())
    })
}

/// Percentage change in the number of women in poverty compared to 2019,
/// for Sub-Saharan Africa and the world. The original poverty count rides
/// along in the index so the chart can show it in tooltips.
pub fn chart_poverty_change_line(ctx: &ChartContext) -> Result<usize> {
    let selected: Vec<PovertyRow> =
        female_povcount(&ctx.tables.poverty, &["Sub-Saharan Africa", "World"])
            .filter(|r| r.year >= BASELINE_YEAR)
            .cloned()
            .collect();
    let changes = pct_change_from_baseline(
        &selected,
        BASELINE_YEAR,
        |r| r.region_name.clone(),
        |r| r.value,
        |r| r.year,
    );

    let cells: Vec<PivotCell> = selected
        .iter()
        .zip(changes)
        .map(|(r, change)| {
            let region = if r.region_name == "Sub-Saharan Africa" {
                "SSA"
            } else {
                "World"
            };
            PivotCell::new(
                vec![r.year.to_string(), fmt_cell(r.value)],
                region,
                change,
            )
        })
        .collect();
    let table = pivot_wide(
        vec!["year".to_string(), "value".to_string()],
        cells,
        Some(vec!["SSA".to_string(), "World".to_string()]),
    )?;

    write_wide_csv(&ctx.paths.out("poverty_change_line.csv"), &table)?;
    Ok(table.rows.len())
}

/// World rows with the projection converted from millions to people and
/// rounded, the unit the pictograms count in.
fn world_counts(ctx: &ChartContext) -> Vec<(i32, f64)> {
    female_povcount(&ctx.tables.poverty, &["World"])
        .filter_map(|r| Some((r.year, (r.value? * 1_000_000.0).round())))
        .collect()
}

/// Women in poverty worldwide, one column per year.
pub fn chart_pictogram_all_years(ctx: &ChartContext) -> Result<usize> {
    let cells: Vec<PivotCell> = world_counts(ctx)
        .into_iter()
        .map(|(year, count)| {
            PivotCell::new(vec!["World".to_string()], year.to_string(), Some(count))
        })
        .collect();
    let table = pivot_wide(vec!["region_name".to_string()], cells, None)?.drop_index();

    write_wide_csv(&ctx.paths.out("poverty_pictogram_all_years.csv"), &table)?;
    Ok(table.rows.len())
}

/// The 2019 level and the increase since 2019, one column per year. Without
/// a 2019 row there is nothing to compare against, so the chart comes out
/// empty rather than failing the run.
pub fn chart_pictogram_increase_2019(ctx: &ChartContext) -> Result<usize> {
    let counts = world_counts(ctx);
    let baseline = counts
        .iter()
        .find(|(year, _)| *year == BASELINE_YEAR)
        .map(|(_, count)| *count);

    let mut cells = Vec::new();
    if let Some(base) = baseline {
        for (year, count) in &counts {
            cells.push(PivotCell::new(
                vec!["value_2019".to_string()],
                year.to_string(),
                Some(base),
            ));
            cells.push(PivotCell::new(
                vec!["change_2019".to_string()],
                year.to_string(),
                Some(count - base),
            ));
        }
    }
    let mut table = pivot_wide(vec!["variable".to_string()], cells, None)?;
    // The chart wants the absolute level row above the change row.
    table.rows.reverse();

    write_wide_csv(
        &ctx.paths.out("poverty_pictogram_increase_2019.csv"),
        &table,
    )?;
    Ok(table.rows.len())
}
