//! Command-line interface for jpmlgen.
//!
//! Maps flags onto [`JpmlOptions`] and runs either the wrap or the envelope
//! strategy over the given include roots.

use clap::{Parser, ValueEnum};
use jpmlgen::output::{self, ReportFormat};
use jpmlgen::{BinaryDetection, JpmlBuilder, JpmlOptions, generate};
use std::path::{Path, PathBuf};
use std::process::exit;

/// jpmlgen — wrap directory trees into loader scripts
#[derive(Parser)]
#[command(name = "jpmlgen", version, about, long_about = None)]
struct Cli {
    /// Input directories to walk
    #[arg(required = true)]
    include: Vec<PathBuf>,

    /// Output directory (can be repeated)
    #[arg(short = 'o', long = "out-dir", required = true)]
    out_dir: Vec<PathBuf>,

    /// Parse files as XML and emit them inside the envelope
    #[arg(long)]
    envelope: bool,

    /// Envelope intro (implies --envelope)
    #[arg(long)]
    intro: Option<String>,

    /// Envelope outro (implies --envelope)
    #[arg(long)]
    outro: Option<String>,

    /// Exclude patterns matched against full paths (can be repeated)
    #[arg(short = 'I', long = "exclude")]
    exclude_patterns: Vec<String>,

    /// Max depth (unlimited if not set)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Follow symlinked directories
    #[arg(long)]
    follow_links: bool,

    /// Binary detection strategy; binary files are skipped
    #[arg(long, default_value = "none", value_parser = parse_binary_detection)]
    binary_detection: BinaryDetection,

    /// Replace the extension of every output file
    #[arg(long)]
    extension: Option<String>,

    /// Use the file stem instead of the full file name as content key
    #[arg(long, conflicts_with = "no_key")]
    key_stem: bool,

    /// Emit no content key
    #[arg(long)]
    no_key: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Pretty JSON report
    #[arg(short, long)]
    pretty: bool,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "simple" => Ok(BinaryDetection::Simple),
        "accurate" => Ok(BinaryDetection::Accurate),
        "none" => Ok(BinaryDetection::None),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

/// Where and how the run report is emitted.
struct Report {
    format: ReportFormat,
    pretty: bool,
    file: Option<PathBuf>,
}

fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

impl Cli {
    fn into_options(self) -> Result<(JpmlOptions, Report), jpmlgen::JpmlError> {
        let mut builder = JpmlBuilder::new()
            .includes(self.include)
            .out_dirs(self.out_dir)
            .exclude_patterns(self.exclude_patterns)
            .follow_links(self.follow_links)
            .binary_detection(self.binary_detection);

        builder = if let Some(depth) = self.max_depth {
            builder.max_depth(depth)
        } else {
            builder.no_limit_depth()
        };
        if self.envelope {
            builder = builder.envelope(Default::default());
        }
        if let Some(intro) = self.intro {
            builder = builder.intro(intro);
        }
        if let Some(outro) = self.outro {
            builder = builder.outro(outro);
        }
        if let Some(ext) = self.extension {
            let ext = ext.trim_start_matches('.').to_string();
            builder = builder.file_name(move |name| format!("{}.{}", file_stem(name), ext));
        }
        if self.no_key {
            builder = builder.key(|_| None);
        } else if self.key_stem {
            builder = builder.key(|name| Some(file_stem(name)));
        }

        let format = match self.format {
            Format::Json => ReportFormat::Json,
            Format::Text => ReportFormat::Text,
        };
        let report = Report {
            format,
            pretty: self.pretty,
            file: self.report,
        };
        Ok((builder.build()?, report))
    }
}

fn main() {
    let cli = Cli::parse();
    let (options, report) = match cli.into_options() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    let reports = match generate(options) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    let emitted = match &report.file {
        Some(path) => {
            output::write_reports_to_file(&reports, report.format, path, report.pretty)
                .map(|_| ())
        }
        None => output::format_reports(&reports, report.format, report.pretty)
            .map(|out| println!("{}", out.trim_end())),
    };
    if let Err(e) = emitted {
        eprintln!("Error: {}", e);
        exit(1);
    }
}
