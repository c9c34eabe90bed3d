// Chart output writing and console previews.
//
// Fixed-schema charts serialize typed rows; pivoted charts with
// data-dependent columns go through the record-based writers. All CSVs are
// written with a header, no index column, and the column order the caller
// built, so reruns over the same inputs are byte-identical.
use crate::error::Result;
use crate::transforms::{MeltRow, WideTable};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Render a cell the way pandas-produced chart files look: integral values
/// without a trailing `.0`, everything else in plain float notation, and
/// missing cells as empty fields.
pub fn fmt_cell(v: Option<f64>) -> String {
    match v {
        None => String::new(),
        Some(x) if x.fract() == 0.0 && x.abs() < 1e15 => format!("{}", x as i64),
        Some(x) => format!("{}", x),
    }
}

pub fn write_wide_csv(path: &Path, table: &WideTable) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let header: Vec<&str> = table
        .index_columns
        .iter()
        .chain(table.value_columns.iter())
        .map(|s| s.as_str())
        .collect();
    wtr.write_record(&header)?;
    for row in &table.rows {
        let mut record: Vec<String> = row.index.clone();
        record.extend(row.values.iter().map(|v| fmt_cell(*v)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a melted (long) table: index columns, then the variable and value
/// columns under caller-chosen names.
pub fn write_long_csv(
    path: &Path,
    index_columns: &[&str],
    var_name: &str,
    value_name: &str,
    rows: &[MeltRow],
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header: Vec<&str> = index_columns.to_vec();
    header.push(var_name);
    header.push(value_name);
    wtr.write_record(&header)?;
    for row in rows {
        let mut record: Vec<String> = row.index.clone();
        record.push(row.variable.clone());
        record.push(fmt_cell(row.value));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Print the first `max_rows` rows of a fixed-schema report as a Markdown
/// table.
pub fn preview_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_render_like_chart_files() {
        assert_eq!(fmt_cell(None), "");
        assert_eq!(fmt_cell(Some(3.0)), "3");
        assert_eq!(fmt_cell(Some(0.05)), "0.05");
        assert_eq!(fmt_cell(Some(-12.5)), "-12.5");
    }
}
