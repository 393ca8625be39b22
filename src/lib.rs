//! # jpmlgen
//!
//! `jpmlgen` walks one or more input directories, turns every file into a
//! loader script and writes it into one or more output directories.
//!
//! Two strategies are available:
//!
//! - **Wrap** (the default, [`generate`]): the raw text goes through a wrapper
//!   function `(text, key) -> text`, or is copied unchanged.
//! - **Envelope** ([`parse_directories`]): the text is parsed as XML, folded
//!   into JSON and placed in an envelope such as `loadJpml({...},"key");`.
//!
//! Every output directory is created (one level) before any file is read.
//! Output files land flat in each output directory under their basename, so
//! equal basenames from different subtrees overwrite each other.
//!
//! # Features
//!
//! - `parallel`: Fans include roots, files and output writes out over Rayon.
//! - `logging`: Enables debug logging via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use jpmlgen::{JpmlBuilder, parse_directories};
//!
//! let options = JpmlBuilder::new()
//!     .include("templates")
//!     .out_dir("dist")
//!     .file_name(|name| format!("{name}.js"))
//!     .key(|name| Some(name.trim_end_matches(".xml").to_string()))
//!     .build()
//!     .expect("invalid configuration");
//!
//! let reports = parse_directories(options).expect("Failed to transform templates");
//! for report in reports {
//!     println!("{}: {} files", report.root.display(), report.files_written);
//! }
//! ```

mod engine;
mod error;
mod options;
pub mod output;
mod transform;
mod types;
pub mod xml;

pub use engine::{generate, parse_directories};
pub use error::JpmlError;
pub use options::{
    BinaryDetection, DEFAULT_INTRO, DEFAULT_OUTRO, Envelope, FileNameFn, FilterFn, Hooks,
    JpmlBuilder, JpmlOptions, KeyFn, Transform, WrapperFn,
};
pub use transform::{JsonpRequest, ParseRequest, generate_jsonp, parse};
pub use types::RootReport;
