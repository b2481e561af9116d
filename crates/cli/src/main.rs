//! CLI tool that builds a presentation with one table per dataset.

mod demo;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use slide_tables_core::{inches, pt, Dataset, Presentation, SlideLayout, TableFormat, TextAlign};
use slide_tables_pptx::{PptxParser, PptxTable, PptxWriter};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Put each dataset as a table on its own slide and save the deck as .pptx.
#[derive(Parser, Debug)]
#[command(name = "slide-tables")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output file
    #[arg(short, long, default_value = "slide_table.pptx")]
    output: PathBuf,

    /// JSON file holding an array of datasets (default: built-in demo data)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Slide width in inches
    #[arg(long, default_value_t = 13.333)]
    slide_width: f64,

    /// Slide height in inches
    #[arg(long, default_value_t = 7.5)]
    slide_height: f64,

    /// Table left edge in inches
    #[arg(long, default_value_t = 1.5)]
    left: f64,

    /// Table top edge in inches
    #[arg(long, default_value_t = 2.0)]
    top: f64,

    /// Table width in inches
    #[arg(long, default_value_t = 5.0)]
    width: f64,

    /// Font size in points
    #[arg(long, default_value_t = 12.0)]
    font_size: f64,

    /// Row height in inches
    #[arg(long, default_value_t = 0.85)]
    row_height: f64,

    /// Paragraph alignment for every cell
    #[arg(long, value_enum)]
    align: Option<Align>,

    /// Relative column widths, e.g. 2,2,2 (default: equal widths)
    #[arg(long, value_delimiter = ',')]
    weights: Option<Vec<f64>>,

    /// Render rows as rows instead of swapping them with columns
    #[arg(long)]
    no_transpose: bool,

    /// Slide layout index (5: title only, 6: blank)
    #[arg(long, default_value_t = 6)]
    layout: usize,

    /// Use the title-only layout and title each slide "Page : n"
    #[arg(long, conflicts_with = "layout")]
    titles: bool,

    /// Re-read the written file and confirm every table matches its dataset
    #[arg(long)]
    check: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Align {
    Left,
    Center,
    Right,
    Justify,
}

impl From<Align> for TextAlign {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => TextAlign::Left,
            Align::Center => TextAlign::Center,
            Align::Right => TextAlign::Right,
            Align::Justify => TextAlign::Justify,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let datasets = match &args.data {
        Some(path) => load_datasets(path)?,
        None => demo::datasets(),
    };

    let prs = build_presentation(&args, &datasets)?;

    PptxWriter::new()
        .save(&prs, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if args.verbose {
        eprintln!(
            "Written {} slides to: {}",
            prs.slide_count(),
            args.output.display()
        );
    }

    if args.check {
        check_output(&args.output, &datasets, !args.no_transpose)?;
        if args.verbose {
            eprintln!("Check passed");
        }
    }

    Ok(())
}

/// Load datasets from a JSON file: an array of datasets, each an array of rows.
fn load_datasets(path: &Path) -> Result<Vec<Dataset>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let datasets: Vec<Dataset> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse datasets in {}", path.display()))?;

    log::debug!("Loaded {} datasets from {}", datasets.len(), path.display());
    Ok(datasets)
}

/// Build the presentation: one slide per dataset, one table per slide.
fn build_presentation(args: &Args, datasets: &[Dataset]) -> Result<Presentation> {
    let layout = if args.titles {
        SlideLayout::TitleOnly
    } else {
        SlideLayout::from_index(args.layout)?
    };

    let weights = match (&args.weights, &args.data) {
        (Some(weights), _) => Some(weights.clone()),
        (None, None) => Some(demo::DEMO_WEIGHTS.to_vec()),
        (None, Some(_)) => None,
    };

    let mut format = TableFormat::new()
        .with_font_size(pt(args.font_size))
        .with_row_height(inches(args.row_height));
    if let Some(align) = args.align {
        format = format.with_alignment(Some(align.into()));
    }

    let mut prs = Presentation::new();
    prs.set_slide_size(inches(args.slide_width), inches(args.slide_height));

    for (n, data) in datasets.iter().enumerate() {
        let slide = prs.add_slide(layout);
        if args.titles {
            slide.set_title(demo::page_title(n))?;
        }

        let mut tbl = PptxTable::new(data, &mut prs);
        tbl.set_table_location(inches(args.left), inches(args.top), inches(args.width))
            .set_formatting(format);
        tbl.create_table(n, weights.as_deref(), !args.no_transpose)
            .with_context(|| format!("Failed to create table for dataset {}", n))?;
    }

    Ok(prs)
}

/// Re-read a written file and confirm it holds one slide per dataset, each
/// with a single table whose cells equal the dataset.
fn check_output(path: &Path, datasets: &[Dataset], transpose: bool) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let prs = PptxParser::new()
        .parse(BufReader::new(file))
        .with_context(|| format!("Failed to read back {}", path.display()))?;

    ensure!(
        prs.slide_count() == datasets.len(),
        "expected {} slides, found {}",
        datasets.len(),
        prs.slide_count()
    );
    for (index, (slide, data)) in prs.slides.iter().zip(datasets).enumerate() {
        ensure!(
            slide.tables.len() == 1,
            "slide {} has {} tables, expected 1",
            index,
            slide.tables.len()
        );

        let expected = data.to_text_grid(transpose)?;
        let cells = &slide.tables[0].cells;
        ensure!(
            *cells == expected,
            "table on slide {} does not match dataset {}: {:?} != {:?}",
            index,
            index,
            cells,
            expected
        );
    }

    log::info!("Checked {}: {} slides", path.display(), prs.slide_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_tables_core::Emu;

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("slide-tables").chain(extra.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_args() {
        let args = args(&[]);
        assert_eq!(args.output, PathBuf::from("slide_table.pptx"));
        assert_eq!(args.layout, 6);
        assert!(args.weights.is_none());
        assert!(!args.no_transpose);
    }

    #[test]
    fn test_demo_presentation() {
        let prs = build_presentation(&args(&[]), &demo::datasets()).unwrap();

        assert_eq!(prs.slide_width, inches(13.333));
        assert_eq!(prs.slide_count(), 2);
        for slide in &prs.slides {
            assert_eq!(slide.layout, SlideLayout::Blank);
            assert!(slide.title.is_none());
            assert_eq!(slide.tables.len(), 1);
        }

        let table = &prs.slides[1].tables[0];
        assert_eq!(table.cell(0, 0), Some("Dd"));
        assert_eq!(table.cell(0, 1), Some("0"));
        assert_eq!(table.cell(1, 0), Some("Ee"));
        assert_eq!(table.left, inches(1.5));
        assert_eq!(table.top, inches(2.0));
        assert_eq!(table.height, Emu(inches(0.85).0 * 3));
        assert_eq!(
            table.column_widths.iter().map(|w| w.0).sum::<i64>(),
            inches(5.0).0
        );
    }

    #[test]
    fn test_titles_and_options() {
        let args = args(&[
            "--titles",
            "--no-transpose",
            "--align",
            "left",
            "--weights",
            "1,2,1",
        ]);
        let prs = build_presentation(&args, &demo::datasets()).unwrap();

        assert_eq!(prs.slides[0].layout, SlideLayout::TitleOnly);
        assert_eq!(prs.slides[1].title.as_deref(), Some("Page : 1"));

        let table = &prs.slides[0].tables[0];
        assert_eq!(table.cell(0, 1), Some("Bb"));
        assert_eq!(table.format.alignment, Some(TextAlign::Left));
        assert!(table.column_widths[1] > table.column_widths[0]);
    }

    #[test]
    fn test_bad_options() {
        assert!(build_presentation(&args(&["--layout", "2"]), &demo::datasets()).is_err());
        assert!(build_presentation(&args(&["--weights", "1,1"]), &demo::datasets()).is_err());
        assert!(build_presentation(&args(&["--font-size", "0.5"]), &demo::datasets()).is_err());
        assert!(build_presentation(&args(&["--row-height", "1e14"]), &demo::datasets()).is_err());

        let conflict = ["slide-tables", "--titles", "--layout", "6"];
        assert!(Args::try_parse_from(conflict).is_err());
    }

    #[test]
    fn test_demo_file_matches_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("slide_table.pptx");
        let datasets = demo::datasets();

        let prs = build_presentation(&args(&[]), &datasets).unwrap();
        PptxWriter::new().save(&prs, &out_path).unwrap();
        check_output(&out_path, &datasets, true).unwrap();

        let file = File::open(&out_path).unwrap();
        let read = PptxParser::new().parse(BufReader::new(file)).unwrap();
        assert_eq!(read.slide_count(), 2);
        assert_eq!(
            read.slides[0].tables[0].cells,
            vec![
                vec!["Aa", "3", "6"],
                vec!["Bb", "4", "7"],
                vec!["Cc", "5", "8"],
            ]
        );
        assert_eq!(
            read.slides[1].tables[0].cells,
            vec![
                vec!["Dd", "0", "6"],
                vec!["Ee", "1", "7"],
                vec!["Ff", "2", "8"],
            ]
        );

        // Same file, but checked as if it had not been transposed
        assert!(check_output(&out_path, &datasets, false).is_err());
        let swapped = vec![datasets[1].clone(), datasets[0].clone()];
        assert!(check_output(&out_path, &swapped, true).is_err());
    }

    #[test]
    fn test_load_datasets_and_check() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("data.json");
        let out_path = dir.path().join("out.pptx");
        std::fs::write(&data_path, r#"[[["a", "b"], [1, 2.5]], [["c"], ["x"], [""]]]"#).unwrap();

        let datasets = load_datasets(&data_path).unwrap();
        assert_eq!(datasets.len(), 2);

        let data_arg = data_path.to_string_lossy().to_string();
        let prs = build_presentation(&args(&["--data", &data_arg]), &datasets).unwrap();
        PptxWriter::new().save(&prs, &out_path).unwrap();

        check_output(&out_path, &datasets, true).unwrap();
        assert!(check_output(&out_path, &datasets[..1], true).is_err());
    }
}
