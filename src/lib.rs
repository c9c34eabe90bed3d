// Chart-ready dataset builder for socioeconomic gender-equality
// indicators: loads long-format source tables, applies a small set of
// transform primitives (latest-value resolution, baseline change, binning,
// pivot/melt, weight maps), and writes one flat CSV per chart.
pub mod charts;
pub mod classifier;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod transforms;
pub mod types;
pub mod util;
