// The transformation primitives every chart builder is assembled from:
// latest-value resolution, percentage change from a baseline period,
// categorical binning, wide pivoting/melting and weight-map building.
//
// All of them are pure functions over typed row slices; I/O stays in the
// loader and output modules.
use crate::error::{Error, Result};
use crate::types::Observation;
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Keep the most recent non-missing observation per group.
///
/// Rows whose value is `None` are dropped before grouping. Within a group,
/// the row with the maximum year wins; when several rows tie for the
/// maximum year the first-encountered row wins, so the result is stable
/// with respect to input order and never contains duplicate groups.
/// Output rows are ordered by group key. Empty input yields empty output.
pub fn resolve_latest<T, K, G, V, Y>(rows: Vec<T>, value: V, group: G, year: Y) -> Vec<T>
where
    K: Ord,
    G: Fn(&T) -> K,
    V: Fn(&T) -> Option<f64>,
    Y: Fn(&T) -> i32,
{
    let mut best: BTreeMap<K, (usize, i32)> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        if value(row).is_none() {
            continue;
        }
        let y = year(row);
        match best.entry(group(row)) {
            Entry::Vacant(e) => {
                e.insert((idx, y));
            }
            Entry::Occupied(mut e) => {
                if y > e.get().1 {
                    e.insert((idx, y));
                }
            }
        }
    }
    let mut slots: Vec<Option<T>> = rows.into_iter().map(Some).collect();
    best.into_values()
        .filter_map(|(idx, _)| slots[idx].take())
        .collect()
}

/// Percentage deviation from the value each group had at exactly
/// `baseline_year`, aligned with the input rows.
///
/// A group without a baseline row yields `None` for all of its rows, and a
/// zero baseline also yields `None` (the documented sentinel for an
/// undefined change); neither case is an error, so downstream charts can
/// filter the gaps out. A row at the baseline year itself reports `0`.
pub fn pct_change_from_baseline<T, K, G, V, Y>(
    rows: &[T],
    baseline_year: i32,
    group: G,
    value: V,
    year: Y,
) -> Vec<Option<f64>>
where
    K: Ord,
    G: Fn(&T) -> K,
    V: Fn(&T) -> Option<f64>,
    Y: Fn(&T) -> i32,
{
    let mut baselines: BTreeMap<K, f64> = BTreeMap::new();
    for row in rows {
        if year(row) != baseline_year {
            continue;
        }
        if let Some(v) = value(row) {
            baselines.entry(group(row)).or_insert(v);
        }
    }
    rows.iter()
        .map(|row| {
            let v = value(row)?;
            let base = *baselines.get(&group(row))?;
            if base == 0.0 {
                return None;
            }
            Some((v - base) / base * 100.0)
        })
        .collect()
}

/// One labeled bin: `(lower, upper]`, with a representative midpoint used
/// as the x value in histogram outputs.
#[derive(Debug, Clone)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub label: String,
    pub midpoint: f64,
}

/// Ordered, contiguous bins over a fixed domain.
///
/// Boundary policy: every bin is lower-exclusive and upper-inclusive,
/// except the first, which also includes its own lower edge so the domain
/// floor is captured. The unit-interval definition uses a near-zero-width
/// first bin to keep "exactly 0" separate from "just above 0".
#[derive(Debug, Clone)]
pub struct BinDefinition {
    bins: Vec<Bin>,
}

static UNIT_INTERVAL: Lazy<BinDefinition> = Lazy::new(|| {
    let edges = [
        0.0, 0.0001, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0,
    ];
    let labels = [
        "0",
        "0.001-0.1",
        "0.1-0.2",
        "0.2-0.3",
        "0.3-0.4",
        "0.4-0.5",
        "0.5-0.6",
        "0.6-0.7",
        "0.7-0.8",
        "0.8-0.9",
        "0.9-1",
    ];
    let midpoints = [
        0.0, 0.05, 0.15, 0.25, 0.35, 0.45, 0.55, 0.65, 0.75, 0.85, 0.95,
    ];
    let bins = (0..labels.len())
        .map(|i| Bin {
            lower: edges[i],
            upper: edges[i + 1],
            label: labels[i].to_string(),
            midpoint: midpoints[i],
        })
        .collect();
    BinDefinition { bins }
});

impl BinDefinition {
    /// Validate ordering and contiguity: each bin's upper edge must equal
    /// the next bin's lower edge, and edges must be strictly increasing.
    pub fn new(bins: Vec<Bin>) -> Result<Self> {
        if bins.is_empty() {
            return Err(Error::BinDefinition("no bins given".to_string()));
        }
        for pair in bins.windows(2) {
            if pair[0].upper != pair[1].lower {
                return Err(Error::BinDefinition(format!(
                    "bins `{}` and `{}` are not contiguous",
                    pair[0].label, pair[1].label
                )));
            }
        }
        for bin in &bins {
            if bin.upper <= bin.lower {
                return Err(Error::BinDefinition(format!(
                    "bin `{}` has non-increasing edges",
                    bin.label
                )));
            }
        }
        Ok(Self { bins })
    }

    /// The 0..1 bins used for bounded indices like the GII: a near-zero
    /// first bin plus ten fixed-width bins.
    pub fn unit_interval() -> &'static Self {
        &UNIT_INTERVAL
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Index of the bin a value falls into, `None` if outside the domain.
    pub fn assign(&self, v: f64) -> Option<usize> {
        for (i, bin) in self.bins.iter().enumerate() {
            let lower_ok = if i == 0 { v >= bin.lower } else { v > bin.lower };
            if lower_ok && v <= bin.upper {
                return Some(i);
            }
        }
        None
    }
}

/// Count of rows falling into one (bin, group) cell.
#[derive(Debug, Clone, PartialEq)]
pub struct BinGroupCount<K> {
    pub bin_index: usize,
    pub group: K,
    pub count: u64,
}

/// Bin each row's value and count rows per (bin, group).
///
/// The output is rectangular: every bin appears for every group, with
/// zero-valued cells filled in, so wide reshapes stay complete. When
/// `keep_groups` is given it is applied strictly after aggregation, both
/// restricting and ordering the groups; otherwise groups are ordered by
/// key. Rows whose value is missing or outside the bin domain are skipped.
pub fn bin_and_count<T, K, G, V>(
    rows: &[T],
    bins: &BinDefinition,
    value: V,
    group: G,
    keep_groups: Option<&[K]>,
) -> Vec<BinGroupCount<K>>
where
    K: Ord + Clone,
    G: Fn(&T) -> Option<K>,
    V: Fn(&T) -> Option<f64>,
{
    let mut counts: BTreeMap<(usize, K), u64> = BTreeMap::new();
    let mut observed: BTreeSet<K> = BTreeSet::new();
    for row in rows {
        let Some(key) = group(row) else { continue };
        observed.insert(key.clone());
        let Some(v) = value(row) else { continue };
        let Some(bin_index) = bins.assign(v) else {
            continue;
        };
        *counts.entry((bin_index, key)).or_insert(0) += 1;
    }

    let groups: Vec<K> = match keep_groups {
        Some(keep) => keep.to_vec(),
        None => observed.into_iter().collect(),
    };

    let mut out = Vec::with_capacity(bins.bins().len() * groups.len());
    for bin_index in 0..bins.bins().len() {
        for key in &groups {
            let count = counts
                .get(&(bin_index, key.clone()))
                .copied()
                .unwrap_or(0);
            out.push(BinGroupCount {
                bin_index,
                group: key.clone(),
                count,
            });
        }
    }
    out
}

/// One cell of a long table about to be pivoted wide.
#[derive(Debug, Clone)]
pub struct PivotCell {
    pub index: Vec<String>,
    pub column: String,
    pub value: Option<f64>,
}

impl PivotCell {
    pub fn new(index: Vec<String>, column: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            index,
            column: column.into(),
            value,
        }
    }
}

/// A pivoted table: named index columns, named value columns, and one row
/// per distinct index tuple. Cells with no source value stay `None` and are
/// written as empty fields.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub index_columns: Vec<String>,
    pub value_columns: Vec<String>,
    pub rows: Vec<WideRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub index: Vec<String>,
    pub values: Vec<Option<f64>>,
}

/// One row of a melted (wide-to-long) table.
#[derive(Debug, Clone, PartialEq)]
pub struct MeltRow {
    pub index: Vec<String>,
    pub variable: String,
    pub value: Option<f64>,
}

impl WideTable {
    /// Reshape back to long: one output row per (index tuple, value column)
    /// pair, skipping empty cells.
    pub fn melt(&self) -> Vec<MeltRow> {
        let mut out = Vec::new();
        for row in &self.rows {
            for (col, value) in self.value_columns.iter().zip(&row.values) {
                if let Some(v) = value {
                    out.push(MeltRow {
                        index: row.index.clone(),
                        variable: col.clone(),
                        value: Some(*v),
                    });
                }
            }
        }
        out
    }

    /// Drop the index columns, keeping only the value columns. Used by
    /// charts whose consumers want the pure wide matrix.
    pub fn drop_index(mut self) -> Self {
        self.index_columns.clear();
        for row in &mut self.rows {
            row.index.clear();
        }
        self
    }

    /// Look up a single cell by index tuple and column name.
    pub fn cell(&self, index: &[String], column: &str) -> Option<f64> {
        let col = self.value_columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|r| r.index == index)
            .and_then(|r| r.values[col])
    }
}

/// Compare index tuples component-wise, numerically where both sides parse
/// as numbers so that years and numeric keys sort as expected.
fn cmp_index(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = match (x.parse::<f64>(), y.parse::<f64>()) {
            (Ok(xn), Ok(yn)) => xn.partial_cmp(&yn).unwrap_or(Ordering::Equal),
            _ => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Pivot long cells into a wide table.
///
/// Two cells landing on the same (index, column) position is a
/// `ReshapeConflict`: it means the upstream indicator selection matched
/// more rows than intended, and the chart must fail rather than fold
/// values. Rows are sorted by index tuple (numeric-aware); columns follow
/// `column_order` when given, otherwise lexicographic order of the columns
/// that occur.
pub fn pivot_wide(
    index_columns: Vec<String>,
    cells: Vec<PivotCell>,
    column_order: Option<Vec<String>>,
) -> Result<WideTable> {
    let mut grid: HashMap<Vec<String>, HashMap<String, Option<f64>>> = HashMap::new();
    let mut seen_columns: BTreeSet<String> = BTreeSet::new();
    for cell in cells {
        seen_columns.insert(cell.column.clone());
        let row = grid.entry(cell.index.clone()).or_default();
        if row.contains_key(&cell.column) {
            return Err(Error::ReshapeConflict {
                index: cell.index,
                column: cell.column,
            });
        }
        row.insert(cell.column, cell.value);
    }

    let value_columns: Vec<String> = match column_order {
        Some(order) => order,
        None => seen_columns.into_iter().collect(),
    };

    let mut keys: Vec<Vec<String>> = grid.keys().cloned().collect();
    keys.sort_by(|a, b| cmp_index(a, b));

    let rows = keys
        .into_iter()
        .map(|key| {
            let cells = &grid[&key];
            let values = value_columns
                .iter()
                .map(|c| cells.get(c).copied().flatten())
                .collect();
            WideRow { index: key, values }
        })
        .collect();

    Ok(WideTable {
        index_columns,
        value_columns,
        rows,
    })
}

/// Build an entity -> weight mapping from an auxiliary indicator table:
/// filter to one indicator, resolve the latest value per entity, collect.
///
/// Absent entities simply have no key; consumers must drop rows whose key
/// is missing rather than substitute zero.
pub fn build_weight_map(rows: &[Observation], indicator_code: &str) -> HashMap<String, f64> {
    let filtered: Vec<Observation> = rows
        .iter()
        .filter(|r| r.indicator_code == indicator_code)
        .cloned()
        .collect();
    let latest = resolve_latest(
        filtered,
        |r| r.value,
        |r| r.entity_code.clone(),
        |r| r.year,
    );
    latest
        .into_iter()
        .filter_map(|r| r.value.map(|v| (r.entity_code, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(entity: &str, indicator: &str, year: i32, value: Option<f64>) -> Observation {
        Observation {
            entity_code: entity.to_string(),
            entity_name: entity.to_string(),
            indicator_code: indicator.to_string(),
            indicator_name: indicator.to_string(),
            year,
            value,
        }
    }

    #[test]
    fn resolve_latest_keeps_max_year_per_group() {
        let rows = vec![
            obs("A", "X", 2018, Some(10.0)),
            obs("A", "X", 2020, Some(15.0)),
        ];
        let out = resolve_latest(rows, |r| r.value, |r| r.entity_code.clone(), |r| r.year);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].year, 2020);
        assert_eq!(out[0].value, Some(15.0));
    }

    #[test]
    fn resolve_latest_skips_missing_values() {
        let rows = vec![
            obs("A", "X", 2019, Some(1.0)),
            obs("A", "X", 2021, None),
            obs("B", "X", 2015, Some(2.0)),
        ];
        let out = resolve_latest(rows, |r| r.value, |r| r.entity_code.clone(), |r| r.year);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].entity_code, "A");
        assert_eq!(out[0].year, 2019);
        assert_eq!(out[1].entity_code, "B");
    }

    #[test]
    fn resolve_latest_empty_input_is_empty_output() {
        let out = resolve_latest(
            Vec::<Observation>::new(),
            |r| r.value,
            |r| r.entity_code.clone(),
            |r| r.year,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn resolve_latest_tie_break_is_first_encountered() {
        // Two rows share the max year: the first one in input order wins.
        let rows = vec![
            obs("A", "X", 2020, Some(1.0)),
            obs("A", "Y", 2020, Some(2.0)),
        ];
        let out = resolve_latest(rows, |r| r.value, |r| r.entity_code.clone(), |r| r.year);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].indicator_code, "X");
    }

    #[test]
    fn pct_change_zero_at_baseline_year() {
        let rows = vec![
            obs("A", "X", 2000, Some(40.0)),
            obs("A", "X", 2010, Some(30.0)),
        ];
        let changes =
            pct_change_from_baseline(&rows, 2000, |r| r.entity_code.clone(), |r| r.value, |r| {
                r.year
            });
        assert_eq!(changes[0], Some(0.0));
        assert_eq!(changes[1], Some(-25.0));
    }

    #[test]
    fn pct_change_missing_baseline_yields_none() {
        let rows = vec![obs("A", "X", 2010, Some(30.0))];
        let changes =
            pct_change_from_baseline(&rows, 2000, |r| r.entity_code.clone(), |r| r.value, |r| {
                r.year
            });
        assert_eq!(changes, vec![None]);
    }

    #[test]
    fn pct_change_zero_baseline_yields_sentinel_not_zero() {
        let rows = vec![
            obs("A", "X", 2000, Some(0.0)),
            obs("A", "X", 2010, Some(30.0)),
        ];
        let changes =
            pct_change_from_baseline(&rows, 2000, |r| r.entity_code.clone(), |r| r.value, |r| {
                r.year
            });
        assert_eq!(changes, vec![None, None]);
    }

    #[test]
    fn bin_assignment_boundaries() {
        let bins = BinDefinition::unit_interval();
        // The domain floor lands in the first, near-zero bin.
        assert_eq!(bins.assign(0.0), Some(0));
        // A shared boundary belongs to the lower-labeled bin.
        assert_eq!(bins.assign(0.1), Some(1));
        assert_eq!(bins.assign(0.100001), Some(2));
        assert_eq!(bins.assign(1.0), Some(10));
        assert_eq!(bins.assign(1.5), None);
        assert_eq!(bins.assign(-0.1), None);
    }

    #[test]
    fn bin_definition_rejects_gaps() {
        let bins = vec![
            Bin {
                lower: 0.0,
                upper: 0.5,
                label: "a".to_string(),
                midpoint: 0.25,
            },
            Bin {
                lower: 0.6,
                upper: 1.0,
                label: "b".to_string(),
                midpoint: 0.8,
            },
        ];
        assert!(BinDefinition::new(bins).is_err());
    }

    #[test]
    fn bin_and_count_simple_counts() {
        let bins = BinDefinition::new(vec![
            Bin {
                lower: 0.0,
                upper: 0.1,
                label: "low".to_string(),
                midpoint: 0.05,
            },
            Bin {
                lower: 0.1,
                upper: 1.0,
                label: "high".to_string(),
                midpoint: 0.55,
            },
        ])
        .unwrap();
        let rows = vec![
            obs("A", "X", 2020, Some(0.05)),
            obs("B", "X", 2020, Some(0.05)),
            obs("C", "X", 2020, Some(0.5)),
        ];
        let counts = bin_and_count(
            &rows,
            &bins,
            |r| r.value,
            |_| Some("all".to_string()),
            None,
        );
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].count, 2); // low
        assert_eq!(counts[1].count, 1); // high
    }

    #[test]
    fn bin_and_count_is_rectangular_with_zero_fill() {
        let bins = BinDefinition::unit_interval();
        let rows = vec![
            obs("A", "X", 2020, Some(0.05)),
            obs("B", "X", 2020, Some(0.95)),
        ];
        let counts = bin_and_count(
            &rows,
            bins,
            |r| r.value,
            |r| Some(r.entity_code.clone()),
            None,
        );
        // 11 bins x 2 groups, zero-filled.
        assert_eq!(counts.len(), 22);
        let total: u64 = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 2);
        assert!(counts
            .iter()
            .any(|c| c.group == "A" && c.bin_index == 1 && c.count == 1));
        assert!(counts
            .iter()
            .any(|c| c.group == "B" && c.bin_index == 1 && c.count == 0));
    }

    #[test]
    fn bin_and_count_allow_list_filters_after_aggregation() {
        let bins = BinDefinition::unit_interval();
        let rows = vec![
            obs("A", "X", 2020, Some(0.05)),
            obs("B", "X", 2020, Some(0.05)),
        ];
        let keep = vec!["B".to_string(), "Z".to_string()];
        let counts = bin_and_count(
            &rows,
            bins,
            |r| r.value,
            |r| Some(r.entity_code.clone()),
            Some(keep.as_slice()),
        );
        // Only the allow-listed groups survive, in allow-list order, and a
        // group with no rows still produces zero-filled cells.
        assert!(counts.iter().all(|c| c.group == "B" || c.group == "Z"));
        assert_eq!(counts.len(), 22);
        let z_total: u64 = counts.iter().filter(|c| c.group == "Z").map(|c| c.count).sum();
        assert_eq!(z_total, 0);
    }

    #[test]
    fn pivot_wide_sorts_rows_and_fills_missing_cells() {
        let cells = vec![
            PivotCell::new(vec!["2010".to_string()], "b", Some(2.0)),
            PivotCell::new(vec!["2009".to_string()], "a", Some(1.0)),
        ];
        let table = pivot_wide(vec!["year".to_string()], cells, None).unwrap();
        assert_eq!(table.value_columns, vec!["a", "b"]);
        assert_eq!(table.rows[0].index, vec!["2009"]);
        assert_eq!(table.rows[0].values, vec![Some(1.0), None]);
        assert_eq!(table.rows[1].values, vec![None, Some(2.0)]);
    }

    #[test]
    fn pivot_wide_detects_reshape_conflict() {
        let cells = vec![
            PivotCell::new(vec!["2010".to_string()], "a", Some(1.0)),
            PivotCell::new(vec!["2010".to_string()], "a", Some(2.0)),
        ];
        let err = pivot_wide(vec!["year".to_string()], cells, None).unwrap_err();
        assert!(matches!(err, Error::ReshapeConflict { .. }));
    }

    #[test]
    fn pivot_wide_respects_explicit_column_order() {
        let cells = vec![
            PivotCell::new(vec!["1".to_string()], "a", Some(1.0)),
            PivotCell::new(vec!["1".to_string()], "b", Some(2.0)),
        ];
        let table = pivot_wide(
            vec!["k".to_string()],
            cells,
            Some(vec!["b".to_string(), "a".to_string(), "c".to_string()]),
        )
        .unwrap();
        assert_eq!(table.value_columns, vec!["b", "a", "c"]);
        assert_eq!(table.rows[0].values, vec![Some(2.0), Some(1.0), None]);
    }

    #[test]
    fn melt_round_trips_non_empty_cells() {
        let cells = vec![
            PivotCell::new(vec!["2020".to_string()], "a", Some(1.0)),
            PivotCell::new(vec!["2020".to_string()], "b", None),
        ];
        let table = pivot_wide(vec!["year".to_string()], cells, None).unwrap();
        let long = table.melt();
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].variable, "a");
        assert_eq!(long[0].value, Some(1.0));
    }

    #[test]
    fn weight_map_uses_latest_value_and_skips_unknowns() {
        let rows = vec![
            obs("A", "POP", 2019, Some(100.0)),
            obs("A", "POP", 2021, Some(120.0)),
            obs("B", "POP", 2020, None),
            obs("C", "GDP", 2020, Some(5.0)),
        ];
        let map = build_weight_map(&rows, "POP");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("A"), Some(&120.0));
        assert!(!map.contains_key("B"));
    }
}
