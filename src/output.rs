//! Formatting of run reports.
//!
//! Provides functions to render the per-root [`RootReport`]s returned by
//! [`generate`](crate::generate) as plain text or JSON.

use crate::{JpmlError, RootReport};
use std::fs;
use std::path::{Path, PathBuf};

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    /// Returns the conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

/// Formats the reports into a string.
pub fn format_reports(
    reports: &[RootReport],
    format: ReportFormat,
    pretty: bool,
) -> Result<String, JpmlError> {
    match format {
        ReportFormat::Text => Ok(format_text(reports)),
        ReportFormat::Json => format_json(reports, pretty),
    }
}

/// Writes the formatted reports to a file and returns the path written.
///
/// A path without an extension gets the format's conventional one.
pub fn write_reports_to_file(
    reports: &[RootReport],
    format: ReportFormat,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<PathBuf, JpmlError> {
    let mut path = path.as_ref().to_path_buf();
    if path.extension().is_none() {
        path.set_extension(format.extension());
    }
    let content = format_reports(reports, format, pretty)?;
    fs::write(&path, content).map_err(|e| JpmlError::io(&path, e))?;
    Ok(path)
}

// ----------------------- Internal formatting -----------------------

fn format_text(reports: &[RootReport]) -> String {
    let mut out = String::with_capacity(128 * reports.len().max(1));
    let (mut written, mut skipped) = (0, 0);
    for report in reports {
        out.push_str(&format!(
            "{}: {} written, {} skipped, {} directories\n",
            report.root.display(),
            report.files_written,
            report.files_skipped,
            report.directories
        ));
        written += report.files_written;
        skipped += report.files_skipped;
    }
    out.push_str(&format!("total: {} written, {} skipped\n", written, skipped));
    out
}

fn format_json(reports: &[RootReport], pretty: bool) -> Result<String, JpmlError> {
    if pretty {
        serde_json::to_string_pretty(reports)
    } else {
        serde_json::to_string(reports)
    }
    .map_err(|e| JpmlError::Serialization(e.to_string()))
}
