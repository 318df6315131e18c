//! Export functionality for decoded Enfora records
//!
//! Writes the records of a [`FrameCapture`] to CSV (positions and command
//! results in separate files) and JSON lines.

use crate::error::Result;
use crate::types::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Export options for controlling output formats
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub csv: bool,
    pub json: bool,
    pub output_dir: Option<String>,
}

/// Files written by an export run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExportReport {
    pub positions_csv: Option<PathBuf>,
    pub results_csv: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

/// Compute `<output dir>/<input stem>`; output files append their suffix
///
/// The output directory defaults to the input file's directory.
pub fn compute_export_base(input_path: &Path, export_options: &ExportOptions) -> PathBuf {
    let base_name = input_path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let output_dir = match export_options.output_dir.as_deref() {
        Some(dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    output_dir.join(base_name)
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Attribute names used by any of the positions, in sorted order
pub fn attribute_columns<'a>(positions: impl Iterator<Item = &'a Position>) -> Vec<String> {
    positions
        .flat_map(|position| position.attributes.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Export decoded records to CSV
///
/// Positions go to `<stem>.positions.csv` with one column per attribute seen
/// in the capture; acknowledgements go to `<stem>.results.csv`. A file is
/// only written when there is at least one record for it.
#[cfg(feature = "csv")]
pub fn export_to_csv(
    capture: &FrameCapture,
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<ExportReport> {
    let base = compute_export_base(input_path, export_options);
    let mut report = ExportReport::default();

    if capture.positions().next().is_some() {
        let path = with_suffix(&base, ".positions.csv");
        ensure_parent_dir(&path)?;
        write_positions_csv(capture, &path)?;
        log::info!("Exported positions to: {}", path.display());
        report.positions_csv = Some(path);
    }

    if capture.results().next().is_some() {
        let path = with_suffix(&base, ".results.csv");
        ensure_parent_dir(&path)?;
        write_results_csv(capture, &path)?;
        log::info!("Exported command results to: {}", path.display());
        report.results_csv = Some(path);
    }

    Ok(report)
}

#[cfg(feature = "csv")]
fn write_positions_csv(capture: &FrameCapture, path: &Path) -> Result<()> {
    let columns = attribute_columns(capture.positions());
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![
        "deviceId",
        "fixTime",
        "valid",
        "latitude",
        "longitude",
        "altitude",
        "speed",
        "course",
    ];
    header.extend(columns.iter().map(String::as_str));
    writer.write_record(&header)?;

    for position in capture.positions() {
        let mut row = vec![
            position.device_id.to_string(),
            position.fix_time.to_rfc3339(),
            position.valid.to_string(),
            format!("{:.6}", position.latitude),
            format!("{:.6}", position.longitude),
            position
                .altitude
                .map(|altitude| altitude.to_string())
                .unwrap_or_default(),
            position.speed.to_string(),
            position.course.to_string(),
        ];
        row.extend(columns.iter().map(|key| {
            position
                .attribute(key)
                .map(ToString::to_string)
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(feature = "csv")]
fn write_results_csv(capture: &FrameCapture, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["deviceId", "fixTime", "latitude", "longitude", "result"])?;

    for result in capture.results() {
        writer.write_record([
            result.device_id.to_string(),
            result.fix.fix_time.to_rfc3339(),
            format!("{:.6}", result.fix.latitude),
            format!("{:.6}", result.fix.longitude),
            result.result().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Export decoded records to JSON lines (`<stem>.jsonl`, one record per line)
#[cfg(feature = "json")]
pub fn export_to_json(
    capture: &FrameCapture,
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<ExportReport> {
    use std::io::{BufWriter, Write};

    let mut report = ExportReport::default();
    if capture.is_empty() {
        return Ok(report);
    }

    let path = with_suffix(&compute_export_base(input_path, export_options), ".jsonl");
    ensure_parent_dir(&path)?;

    let file = std::fs::File::create(&path)?;
    let mut writer = BufWriter::new(file);
    for record in &capture.records {
        serde_json::to_writer(&mut writer, record)?;
        writeln!(writer)?;
    }
    writer.flush()?;

    log::info!("Exported records to: {}", path.display());
    report.json_path = Some(path);
    Ok(report)
}

/// Run every export enabled in `export_options`
pub fn export_capture(
    capture: &FrameCapture,
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<ExportReport> {
    #[allow(unused_mut)]
    let mut report = ExportReport::default();

    if export_options.csv {
        #[cfg(feature = "csv")]
        {
            let csv_report = export_to_csv(capture, input_path, export_options)?;
            report.positions_csv = csv_report.positions_csv;
            report.results_csv = csv_report.results_csv;
        }
        #[cfg(not(feature = "csv"))]
        return Err(crate::error::EnforaError::Export(
            "CSV export requires the `csv` feature".to_string(),
        ));
    }

    if export_options.json {
        #[cfg(feature = "json")]
        {
            report.json_path = export_to_json(capture, input_path, export_options)?.json_path;
        }
        #[cfg(not(feature = "json"))]
        return Err(crate::error::EnforaError::Export(
            "JSON export requires the `json` feature".to_string(),
        ));
    }

    Ok(report)
}
