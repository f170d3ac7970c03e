use anyhow::{Result, anyhow};
use log::info;

use crate::{cli::PreviewArgs, dataset::Dataset, io_utils, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    if args.rows == 0 {
        return Err(anyhow!("--rows must be at least 1"));
    }
    if args.page == 0 {
        return Err(anyhow!("--page is 1-based"));
    }
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let dataset = Dataset::from_csv_path(&args.input, delimiter, encoding)?;

    let pages = dataset.len().div_ceil(args.rows).max(1);
    let rows = page_rows(&dataset, args.rows, args.page);
    table::print_table(dataset.headers(), &rows);
    info!(
        "Displayed {} row(s) from {:?} (page {} of {})",
        rows.len(),
        args.input,
        args.page,
        pages
    );
    Ok(())
}

pub fn page_rows(dataset: &Dataset, per_page: usize, page: usize) -> Vec<Vec<String>> {
    let start = per_page.saturating_mul(page.saturating_sub(1));
    dataset
        .records()
        .iter()
        .skip(start)
        .take(per_page)
        .map(|record| record.cells().iter().map(|cell| cell.as_display()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Dataset {
        Dataset::new(
            "numbers",
            vec!["n".to_string()],
            (1..=count).map(|n| vec![n.to_string()]),
        )
        .unwrap()
    }

    #[test]
    fn pages_are_one_based_and_the_last_page_is_short() {
        let dataset = numbered(7);
        assert_eq!(page_rows(&dataset, 3, 1), vec![vec!["1"], vec!["2"], vec!["3"]]);
        assert_eq!(page_rows(&dataset, 3, 3), vec![vec!["7"]]);
        assert!(page_rows(&dataset, 3, 4).is_empty());
    }
}
