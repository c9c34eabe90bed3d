// Reference classifier: entity code -> canonical short name, continent and
// income group. The lookup data is a local reference CSV; an unknown code
// is a data-quality signal (aggregates, historical entities), not an error,
// so every lookup returns an Option and callers filter.
use crate::error::Result;
use crate::loader::ensure_columns;
use crate::util::clean_str;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawReferenceRow {
    #[serde(rename = "iso3")]
    iso3: Option<String>,
    #[serde(rename = "name_short")]
    name_short: Option<String>,
    #[serde(rename = "continent")]
    continent: Option<String>,
    #[serde(rename = "income_level")]
    income_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EntityClass {
    pub name_short: String,
    pub continent: String,
    pub income_level: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceClassifier {
    entries: HashMap<String, EntityClass>,
}

impl ReferenceClassifier {
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
        ensure_columns(
            rdr.headers()?,
            "reference_countries",
            &["iso3", "name_short", "continent"],
        )?;
        let mut entries = HashMap::new();
        for result in rdr.deserialize::<RawReferenceRow>() {
            let row = match result {
                Ok(r) => r,
                Err(_) => continue,
            };
            let (Some(iso3), Some(name_short), Some(continent)) = (
                clean_str(row.iso3.as_deref()),
                clean_str(row.name_short.as_deref()),
                clean_str(row.continent.as_deref()),
            ) else {
                continue;
            };
            entries.insert(
                iso3,
                EntityClass {
                    name_short,
                    continent,
                    income_level: clean_str(row.income_level.as_deref()),
                },
            );
        }
        Ok(Self { entries })
    }

    /// Build directly from entries; used by tests with fixture data.
    pub fn from_entries(entries: HashMap<String, EntityClass>) -> Self {
        Self { entries }
    }

    pub fn name_short(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(|e| e.name_short.as_str())
    }

    pub fn continent(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(|e| e.continent.as_str())
    }

    pub fn income_level(&self, code: &str) -> Option<&str> {
        self.entries.get(code).and_then(|e| e.income_level.as_deref())
    }

    /// Whether the code names a country (as opposed to a regional or income
    /// aggregate, which the reference table does not carry).
    pub fn is_country(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> ReferenceClassifier {
        let mut entries = HashMap::new();
        entries.insert(
            "KEN".to_string(),
            EntityClass {
                name_short: "Kenya".to_string(),
                continent: "Africa".to_string(),
                income_level: Some("Lower middle income".to_string()),
            },
        );
        ReferenceClassifier::from_entries(entries)
    }

    #[test]
    fn known_code_resolves_all_attributes() {
        let c = sample();
        assert_eq!(c.name_short("KEN"), Some("Kenya"));
        assert_eq!(c.continent("KEN"), Some("Africa"));
        assert_eq!(c.income_level("KEN"), Some("Lower middle income"));
        assert!(c.is_country("KEN"));
    }

    #[test]
    fn unknown_code_is_a_gap_not_an_error() {
        let c = sample();
        assert_eq!(c.name_short("ZZJ.SSA"), None);
        assert!(!c.is_country("WLD"));
    }

    #[test]
    fn loads_from_csv_and_checks_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference_countries.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "iso3,name_short,continent,income_level").unwrap();
        writeln!(f, "FRA,France,Europe,High income").unwrap();
        writeln!(f, "SSD,South Sudan,Africa,").unwrap();
        drop(f);

        let c = ReferenceClassifier::from_csv(&path).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.continent("FRA"), Some("Europe"));
        assert_eq!(c.income_level("SSD"), None);

        let bad = dir.path().join("bad.csv");
        std::fs::write(&bad, "code,name\nFRA,France\n").unwrap();
        assert!(ReferenceClassifier::from_csv(&bad).is_err());
    }
}
