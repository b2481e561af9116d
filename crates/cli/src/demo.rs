//! Built-in datasets used when no data file is given.

use slide_tables_core::Dataset;

/// Column weights used for the built-in datasets.
pub const DEMO_WEIGHTS: [f64; 3] = [2.0, 2.0, 2.0];

/// The two demo datasets, one per slide.
pub fn datasets() -> Vec<Dataset> {
    vec![
        Dataset::with_header(["Aa", "Bb", "Cc"], vec![vec![3i64, 4, 5], vec![6, 7, 8]]),
        Dataset::with_header(["Dd", "Ee", "Ff"], vec![vec![0i64, 1, 2], vec![6, 7, 8]]),
    ]
}

/// Slide title used with `--titles`. Pages are numbered from zero.
pub fn page_title(index: usize) -> String {
    format!("Page : {}", index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_tables_core::CellValue;

    fn header(data: &Dataset) -> Vec<String> {
        data.header()
            .map(|row| row.iter().map(CellValue::as_text).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_demo_datasets() {
        let data = datasets();
        assert_eq!(data.len(), 2);
        assert_eq!(header(&data[0]), ["Aa", "Bb", "Cc"]);
        assert_eq!(header(&data[1]), ["Dd", "Ee", "Ff"]);
        for dataset in &data {
            dataset.validate().unwrap();
            assert_eq!(dataset.row_count(), 3);
            assert_eq!(dataset.column_count(), DEMO_WEIGHTS.len());
        }
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title(0), "Page : 0");
        assert_eq!(page_title(12), "Page : 12");
    }
}
