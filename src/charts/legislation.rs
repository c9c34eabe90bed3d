// Charts about legal equality and political participation, from the World
// Bank Women, Business and the Law extract and the gender extract.
use crate::charts::ChartContext;
use crate::error::Result;
use crate::output::write_csv;
use crate::transforms::resolve_latest;
use crate::types::{BeeswarmRow, MarimekkoRow, Observation};
use std::cmp::Ordering;
use std::collections::HashMap;

/// The yes/no law indicators shown in the WBL marimekko.
const LAWS: [&str; 5] = [
    "SG.LAW.EQRM.WK",
    "SG.LAW.NODC.HR",
    "SG.GET.JOBS.EQ",
    "SG.CNT.SIGN.EQ",
    "SG.PEN.SXHR.EM",
];

/// Proportion of seats held by women in national parliaments (%).
const PARLIAMENT_SEATS: &str = "SG.GEN.PARL.ZS";

/// Resolve the latest yes/no answer per (country, law) and size each bar
/// by the country's female population.
///
/// The source encodes answers as 0/1; the chart wants -1/+1 so the bars
/// hang below or above the axis. Countries without a female-population
/// weight are dropped rather than drawn with a zero width, and very small
/// countries get their width clamped up to 1 so every bar stays visible.
fn make_marimekko(ctx: &ChartContext, indicators: &[&str]) -> Vec<MarimekkoRow> {
    let selected: Vec<Observation> = ctx
        .tables
        .law
        .iter()
        .filter(|r| {
            indicators.contains(&r.indicator_code.as_str())
                && matches!(r.value, Some(v) if v == 0.0 || v == 1.0)
        })
        .cloned()
        .collect();
    let latest = resolve_latest(
        selected,
        |r| r.value,
        |r| (r.entity_code.clone(), r.indicator_code.clone()),
        |r| r.year,
    );

    struct Prep {
        row: Observation,
        answer: i64,
        female_pop: f64,
    }
    let mut prepared = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for r in latest {
        let Some(pop) = ctx.female_population.get(&r.entity_code).copied() else {
            continue;
        };
        let answer = match r.value {
            Some(v) if v == 1.0 => 1,
            Some(v) if v == 0.0 => -1,
            _ => continue,
        };
        *totals.entry(r.indicator_name.clone()).or_insert(0.0) += pop;
        prepared.push(Prep {
            row: r,
            answer,
            female_pop: pop,
        });
    }

    let mut rows: Vec<MarimekkoRow> = prepared
        .into_iter()
        .map(|p| {
            let total = totals.get(&p.row.indicator_name).copied().unwrap_or(0.0);
            let width = if total > 0.0 {
                (p.female_pop / total * 100.0).max(1.0)
            } else {
                1.0
            };
            MarimekkoRow {
                indicator_name: p.row.indicator_name,
                entity_name: p.row.entity_name,
                year: p.row.year,
                value_label: if p.answer == 1 { "yes" } else { "no" }.to_string(),
                value: p.answer,
                female_pop: p.female_pop,
                width,
                female_pop_annot: p.female_pop / 1_000_000.0,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.female_pop
            .partial_cmp(&a.female_pop)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.indicator_name.cmp(&b.indicator_name))
            .then_with(|| a.entity_name.cmp(&b.entity_name))
    });
    rows
}

pub fn chart_laws_marimekko(ctx: &ChartContext) -> Result<usize> {
    let rows = make_marimekko(ctx, &LAWS);
    write_csv(&ctx.paths.out("laws_marimekko.csv"), &rows)?;
    Ok(rows.len())
}

/// Latest share of parliament seats held by women per country, with
/// continent and income level for the beeswarm's grouping and color.
pub fn chart_parliament_participation_beeswarm(ctx: &ChartContext) -> Result<usize> {
    let selected: Vec<Observation> = ctx
        .tables
        .gender
        .iter()
        .filter(|r| r.indicator_code == PARLIAMENT_SEATS)
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
        let Some(value) = r.value else { continue };
        // Aggregates (income groups, regions) are not in the reference
        // table and fall out here.
        let Some(continent) = ctx.classifier.continent(&r.entity_code) else {
            continue;
        };
        rows.push(BeeswarmRow {
            continent: continent.to_string(),
            value,
            income_level: ctx
                .classifier
                .income_level(&r.entity_code)
                .map(str::to_string),
            entity_name: r.entity_name.clone(),
            year: r.year,
        });
    }

    write_csv(
        &ctx.paths.out("parliament_participation_beeswarm.csv"),
        &rows,
    )?;
    Ok(rows.len())
}
