// Chart builders. Every chart follows the same template: select indicator
// rows, resolve latest values (unless it is a time series), enrich via the
// classifier and weight maps, reshape to the layout the front-end chart
// expects, and write one CSV under the output directory.
//
// Charts are independent of each other, so the run fans out across a rayon
// thread pool; one chart failing is logged and recorded without stopping
// its siblings.
pub mod education;
pub mod employment;
pub mod hdr;
pub mod legislation;
pub mod maternal_mortality;
pub mod poverty;

use crate::classifier::ReferenceClassifier;
use crate::config::Paths;
use crate::error::Result;
use crate::loader::SourceTables;
use crate::transforms::build_weight_map;
use crate::types::ChartStatus;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, error};

/// Weight-map indicator codes, all resolved from the WDI extract.
pub const FEMALE_POPULATION: &str = "SP.POP.TOTL.FE.IN";
pub const TOTAL_POPULATION: &str = "SP.POP.TOTL";
pub const GDP_PER_CAPITA: &str = "NY.GDP.PCAP.CD";

/// Everything a chart builder needs for one run: the loaded source tables,
/// the reference classifier, and the weight maps, all built once and shared
/// read-only across the parallel chart tasks.
pub struct ChartContext<'a> {
    pub tables: &'a SourceTables,
    pub classifier: &'a ReferenceClassifier,
    pub paths: &'a Paths,
    pub female_population: HashMap<String, f64>,
    pub population: HashMap<String, f64>,
    pub gdp_per_capita: HashMap<String, f64>,
}

impl<'a> ChartContext<'a> {
    pub fn new(
        tables: &'a SourceTables,
        classifier: &'a ReferenceClassifier,
        paths: &'a Paths,
    ) -> Self {
        Self {
            female_population: build_weight_map(&tables.wdi, FEMALE_POPULATION),
            population: build_weight_map(&tables.wdi, TOTAL_POPULATION),
            gdp_per_capita: build_weight_map(&tables.wdi, GDP_PER_CAPITA),
            tables,
            classifier,
            paths,
        }
    }
}

/// One chart: a stable name (also the output file stem) and the builder
/// function. Builders return the number of rows written.
pub struct ChartJob {
    pub name: &'static str,
    pub run: fn(&ChartContext) -> Result<usize>,
}

pub fn all_charts() -> Vec<ChartJob> {
    vec![
        ChartJob {
            name: "education_attainment_scatter",
            run: education::chart_scatter_attainment,
        },
        ChartJob {
            name: "hdr_gii_explorer",
            run: hdr::chart_gii_explorer,
        },
        ChartJob {
            name: "hdr_gii_histogram_continents",
            run: hdr::chart_histogram_continents,
        },
        ChartJob {
            name: "hdr_gii_histogram_income",
            run: hdr::chart_histogram_income,
        },
        ChartJob {
            name: "hdr_gii_histogram_time_series",
            run: hdr::chart_histogram_time_series,
        },
        ChartJob {
            name: "hdr_education_connected_dot_ssa",
            run: hdr::chart_education_connected_dot_ssa,
        },
        ChartJob {
            name: "hdr_education_regions_time_series",
            run: hdr::chart_education_regions_time_series,
        },
        ChartJob {
            name: "unpaid_work",
            run: employment::chart_unpaid_work,
        },
        ChartJob {
            name: "labor_force_world",
            run: employment::chart_labor_force_world,
        },
        ChartJob {
            name: "labor_force_income",
            run: employment::chart_labor_force_income,
        },
        ChartJob {
            name: "laws_marimekko",
            run: legislation::chart_laws_marimekko,
        },
        ChartJob {
            name: "parliament_participation_beeswarm",
            run: legislation::chart_parliament_participation_beeswarm,
        },
        ChartJob {
            name: "mmr_line_change_in_mmr",
            run: maternal_mortality::chart_line_change_in_mmr,
        },
        ChartJob {
            name: "mmr_pictogram_world",
            run: maternal_mortality::chart_pictogram_world,
        },
        ChartJob {
            name: "mmr_pictogram_ssa_rest_of_world",
            run: maternal_mortality::chart_pictogram_ssa_rest_of_world,
        },
        ChartJob {
            name: "poverty_change_line",
            run: poverty::chart_poverty_change_line,
        },
        ChartJob {
            name: "poverty_pictogram_all_years",
            run: poverty::chart_pictogram_all_years,
        },
        ChartJob {
            name: "poverty_pictogram_increase_2019",
            run: poverty::chart_pictogram_increase_2019,
        },
    ]
}

/// Run every chart against the shared context. Charts run in parallel and
/// are isolated from each other's failures; the caller decides what a
/// partially failed run means for the process exit code.
pub fn update_all(ctx: &ChartContext) -> Vec<ChartStatus> {
    let jobs = all_charts();
    jobs.par_iter()
        .map(|job| match (job.run)(ctx) {
            Ok(rows) => {
                debug!(chart = job.name, rows, "updated chart");
                ChartStatus {
                    chart: job.name.to_string(),
                    rows: Some(rows),
                    status: "ok".to_string(),
                }
            }
            Err(e) => {
                error!(chart = job.name, error = %e, "chart failed");
                ChartStatus {
                    chart: job.name.to_string(),
                    rows: None,
                    status: format!("failed: {}", e),
                }
            }
        })
        .collect()
}
