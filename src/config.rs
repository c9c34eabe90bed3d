use std::path::PathBuf;

/// Directory layout for one pipeline run: where the raw source tables live
/// and where the chart CSVs are written.
#[derive(Debug, Clone)]
pub struct Paths {
    pub raw_data: PathBuf,
    pub output: PathBuf,
}

impl Paths {
    pub fn new(raw_data: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            raw_data: raw_data.into(),
            output: output.into(),
        }
    }

    /// Build paths from the first two CLI arguments, falling back to
    /// `raw_data/` and `output/` in the working directory.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
        let raw = args.next().unwrap_or_else(|| "raw_data".to_string());
        let out = args.next().unwrap_or_else(|| "output".to_string());
        Self::new(raw, out)
    }

    pub fn raw(&self, file: &str) -> PathBuf {
        self.raw_data.join(file)
    }

    pub fn out(&self, file: &str) -> PathBuf {
        self.output.join(file)
    }
}
