//! Output writers for figure sweeps.
//!
//! This module provides:
//! - one CSV per figure, gaps as empty cells
//! - a JSON file with every figure
//! - a markdown report summarizing each column

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use saturation::output::{to_json_pretty, write_csv as write_table};

use crate::figures::Figure;
use crate::sweep::SweepResults;

/// Write one figure to CSV.
pub fn write_csv(figure: &Figure, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_table(&figure.table, &mut writer)?;
    writer.flush()
}

/// Write every figure to JSON.
pub fn write_json(results: &SweepResults, path: &Path) -> io::Result<()> {
    let json = to_json_pretty(&results.figures)?;
    fs::write(path, json)
}

/// Write `<name>.csv` for each figure, `figures.json` and `report.md` into
/// `dir`, creating it if needed. Returns the written paths.
pub fn write_all(results: &SweepResults, dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(results.figures.len() + 2);

    for figure in &results.figures {
        let path = dir.join(format!("{}.csv", figure.id.name()));
        write_csv(figure, &path)?;
        written.push(path);
    }

    let path = dir.join("figures.json");
    write_json(results, &path)?;
    written.push(path);

    let path = dir.join("report.md");
    fs::write(&path, to_markdown(results))?;
    written.push(path);

    Ok(written)
}

/// Generate markdown report from results.
pub fn to_markdown(results: &SweepResults) -> String {
    let config = &results.config;
    let mut md = String::new();

    // Title
    md.push_str(&format!("# Saturation Figures ({})\n\n", config.preset.name()));

    // Summary
    md.push_str("## Configuration\n\n");
    md.push_str(&format!("- **Preset**: {}\n", config.preset.name()));
    md.push_str(&format!(
        "- **Population**: {}\n",
        config.simulation.population
    ));
    md.push_str(&format!(
        "- **Experiments**: {}\n",
        config.simulation.experiments
    ));
    md.push_str(&format!("- **Seed**: {}\n", config.simulation.seed));
    md.push_str(&format!("- **Confidences**: {:?}\n", config.confidences));
    md.push_str(&format!("- **Occurrences**: {:?}\n", config.occurrences));
    md.push_str(&format!(
        "- **Interviews**: {} ({} themes, Zipf s = {})\n",
        config.interviews.interviews, config.interviews.themes, config.interviews.zipf_exponent
    ));
    md.push_str(&format!(
        "- **Total execution time**: {:.1}s\n\n",
        results.total_time.as_secs_f64()
    ));

    for figure in &results.figures {
        md.push_str(&format!(
            "## {}: {}\n\n",
            figure.id.name(),
            figure.id.title()
        ));
        md.push_str(&column_table(figure));
        md.push('\n');
    }

    md
}

/// Points, gaps and range of each column.
fn column_table(figure: &Figure) -> String {
    let table = &figure.table;
    let mut out = String::new();
    out.push_str("| Series | Points | Gaps | Min | Max |\n");
    out.push_str("|--------|--------|------|-----|-----|\n");

    for label in &table.columns {
        let values: Vec<f64> = table
            .column(label)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();
        let gaps = table.gaps(label).unwrap_or(0);
        let (min, max) = match (
            values.iter().copied().reduce(f64::min),
            values.iter().copied().reduce(f64::max),
        ) {
            (Some(min), Some(max)) => (format!("{min:.4}"), format!("{max:.4}")),
            _ => ("-".to_string(), "-".to_string()),
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            label,
            values.len(),
            gaps,
            min,
            max
        ));
    }

    out
}
