//! Column listing for a CSV file.
//!
//! Shows each column's position and name alongside how many rows carry a
//! value and the first non-empty value seen, which helps pick key columns.

use anyhow::Result;
use log::info;

use crate::{cli::ColumnsArgs, dataset::Dataset, io_utils, table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProfile {
    pub position: usize,
    pub name: String,
    pub filled: usize,
    pub sample: Option<String>,
}

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let dataset = Dataset::from_csv_path(&args.input, delimiter, encoding)?;

    let profiles = profile_columns(&dataset);
    let headers = vec![
        "#".to_string(),
        "name".to_string(),
        "non-empty".to_string(),
        "sample".to_string(),
    ];
    let rows = profiles
        .iter()
        .map(|profile| {
            vec![
                profile.position.to_string(),
                profile.name.clone(),
                format!("{}/{}", profile.filled, dataset.len()),
                profile.sample.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    info!("Listed {} column(s) from {:?}", profiles.len(), args.input);
    Ok(())
}

pub fn profile_columns(dataset: &Dataset) -> Vec<ColumnProfile> {
    dataset
        .headers()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut filled = 0;
            let mut sample = None;
            for record in dataset.records() {
                let cell = record.cell(idx);
                if cell.is_empty() {
                    continue;
                }
                filled += 1;
                if sample.is_none() {
                    sample = Some(cell.as_display());
                }
            }
            ColumnProfile {
                position: idx + 1,
                name: name.clone(),
                filled,
                sample,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_filled_cells_and_takes_first_sample() {
        let dataset = Dataset::new(
            "contacts",
            vec!["name".to_string(), "email".to_string()],
            vec![vec!["Ann", ""], vec!["Ben", "ben@example.com"], vec!["Cy", "cy@example.com"]],
        )
        .unwrap();
        let profiles = profile_columns(&dataset);
        assert_eq!(profiles[0].filled, 3);
        assert_eq!(profiles[0].sample.as_deref(), Some("Ann"));
        assert_eq!(profiles[1].position, 2);
        assert_eq!(profiles[1].filled, 2);
        assert_eq!(profiles[1].sample.as_deref(), Some("ben@example.com"));
    }
}
