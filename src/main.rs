// Entry point: one batch run.
//
// - Load every source table and the reference classifier, printing
//   per-table diagnostics.
// - Build the shared chart context (classifier + weight maps).
// - Fan the chart builders out in parallel; a failing chart is recorded
//   but never stops its siblings.
// - Print a status table and write a JSON run summary next to the charts.
use gender_charts::charts::{self, ChartContext};
use gender_charts::classifier::ReferenceClassifier;
use gender_charts::config::Paths;
use gender_charts::error::Result;
use gender_charts::loader;
use gender_charts::output;
use gender_charts::types::RunSummary;
use gender_charts::util::format_int;
use tracing_subscriber::EnvFilter;

fn run(paths: &Paths) -> Result<RunSummary> {
    std::fs::create_dir_all(&paths.output)?;

    let (tables, reports) = loader::load_all(paths)?;
    for r in &reports {
        println!(
            "Loaded {}: {} rows kept of {} ({} skipped for parse/validation errors)",
            r.table,
            format_int(r.kept_rows as i64),
            format_int(r.total_rows as i64),
            format_int(r.parse_errors as i64)
        );
    }

    let classifier = ReferenceClassifier::from_csv(&paths.raw("reference_countries.csv"))?;
    println!(
        "Loaded reference classifier: {} entities\n",
        format_int(classifier.len() as i64)
    );

    let ctx = ChartContext::new(&tables, &classifier, paths);
    let statuses = charts::update_all(&ctx);

    let charts_failed = statuses.iter().filter(|s| s.rows.is_none()).count();
    let summary = RunSummary {
        charts_total: statuses.len(),
        charts_succeeded: statuses.len() - charts_failed,
        charts_failed,
        charts: statuses,
    };
    output::write_json(&paths.out("run_summary.json"), &summary)?;
    Ok(summary)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let paths = Paths::from_args(std::env::args().skip(1));
    println!(
        "Updating charts: {} -> {}\n",
        paths.raw_data.display(),
        paths.output.display()
    );

    match run(&paths) {
        Ok(summary) => {
            output::preview_rows(&summary.charts, summary.charts.len());
            println!(
                "{} of {} charts updated (summary written to run_summary.json)",
                summary.charts_succeeded, summary.charts_total
            );
            if summary.charts_failed > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}
