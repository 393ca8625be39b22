use crate::error::JpmlError;
use crate::options::{BinaryDetection, Envelope, JpmlOptions, Transform};
use crate::transform::apply;
use crate::types::{RootReport, WalkStats};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

const BINARY_SNIFF_LEN: usize = 4096;

struct Walker<'a> {
    options: &'a JpmlOptions,
    matcher: Option<GlobSet>,
}
impl<'a> Walker<'a> {
    fn new(options: &'a JpmlOptions) -> Result<Self, JpmlError> {
        let matcher = if !options.exclude_patterns.is_empty() {
            let mut glob_builder = GlobSetBuilder::new();
            for pattern in &options.exclude_patterns {
                let glob = Glob::new(pattern).map_err(|e| {
                    JpmlError::Walk(format!("Invalid glob pattern '{}': {}", pattern, e))
                })?;
                glob_builder.add(glob);
            }
            Some(
                glob_builder
                    .build()
                    .map_err(|e| JpmlError::Walk(format!("Failed to build glob set: {}", e)))?,
            )
        } else {
            None
        };
        Ok(Self { options, matcher })
    }
    fn is_excluded(&self, path: &Path) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(path))
    }
    fn walk_root(&self, root: &Path) -> Result<RootReport, JpmlError> {
        #[cfg(feature = "logging")]
        tracing::debug!("Walking include root: {}", root.display());
        let (files, directories) = self.collect_entries(root)?;
        #[cfg(not(feature = "parallel"))]
        let stats = self.process_files(&files)?;
        #[cfg(feature = "parallel")]
        let stats = self.process_files_parallel(&files)?;
        let stats = stats.merge(WalkStats::directories(directories));
        Ok(stats.into_report(root.to_path_buf()))
    }
    /// Lists every non-directory entry below `root` and counts the
    /// subdirectories on the way.
    ///
    /// Excluded entries are pruned before they are descended into. Symlink
    /// loops met while following links are skipped; the looping directory is
    /// already being walked.
    fn collect_entries(&self, root: &Path) -> Result<(Vec<PathBuf>, usize), JpmlError> {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(self.options.follow_links)
            .max_depth(self.options.max_depth);
        if let Some(ref matcher) = self.matcher {
            let matcher = matcher.clone();
            builder.filter_entry(move |entry| !matcher.is_match(entry.path()));
        }
        let mut files = Vec::new();
        let mut directories = 0;
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => match self.walk_error(err, root) {
                    Some(e) => return Err(e),
                    None => continue,
                },
            };
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if entry.depth() == 0 {
                if !is_dir {
                    let source =
                        std::io::Error::new(ErrorKind::NotADirectory, "not a directory");
                    return Err(JpmlError::io(root, source));
                }
                continue;
            }
            if is_dir {
                directories += 1;
            } else {
                files.push(entry.into_path());
            }
        }
        Ok((files, directories))
    }
    /// Maps a walk error to the batch error, or `None` when the entry is
    /// skipped instead (symlink loops and entries matching an exclude pattern).
    fn walk_error(&self, err: ignore::Error, path: &Path) -> Option<JpmlError> {
        match err {
            ignore::Error::WithPath { path, err } => self.walk_error(*err, &path),
            ignore::Error::WithDepth { err, .. } => self.walk_error(*err, path),
            ignore::Error::Loop { .. } => {
                #[cfg(feature = "logging")]
                tracing::debug!("Skipping symlink loop at {}", path.display());
                None
            }
            _ if self.is_excluded(path) => None,
            ignore::Error::Io(source) => Some(JpmlError::io(path, source)),
            other => Some(JpmlError::Walk(format!("{}: {}", path.display(), other))),
        }
    }
    #[cfg(not(feature = "parallel"))]
    fn process_files(&self, paths: &[PathBuf]) -> Result<WalkStats, JpmlError> {
        paths.iter().try_fold(WalkStats::default(), |acc, path| {
            Ok(acc.merge(self.process_file(path)?))
        })
    }
    #[cfg(feature = "parallel")]
    fn process_files_parallel(&self, paths: &[PathBuf]) -> Result<WalkStats, JpmlError> {
        paths
            .par_iter()
            .map(|path| self.process_file(path))
            .try_reduce(WalkStats::default, |a, b| Ok(a.merge(b)))
    }
    fn process_file(&self, path: &Path) -> Result<WalkStats, JpmlError> {
        let hooks = &self.options.hooks;
        if let Some(filter) = &hooks.filter {
            if !filter(path) {
                #[cfg(feature = "logging")]
                tracing::debug!("Filtered out: {}", path.display());
                return Ok(WalkStats::skipped());
            }
        }
        let Some(content_text) = read_text(path, self.options.binary_detection)? else {
            return Ok(WalkStats::skipped());
        };
        let base_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = match &hooks.file_name {
            Some(rename) => rename(&base_name),
            None => base_name.clone(),
        };
        check_file_name(&file_name)?;
        let content_key = match &hooks.key {
            Some(key) => key(&base_name),
            None => Some(base_name),
        };
        let output = apply(&self.options.transform, &content_text, content_key.as_deref())?;
        #[cfg(not(feature = "parallel"))]
        self.write_outputs(&file_name, &output)?;
        #[cfg(feature = "parallel")]
        self.write_outputs_parallel(&file_name, &output)?;
        Ok(WalkStats::written())
    }
    #[cfg(not(feature = "parallel"))]
    fn write_outputs(&self, file_name: &str, content: &str) -> Result<(), JpmlError> {
        self.options
            .out_dir
            .iter()
            .try_for_each(|dir| write_output(dir, file_name, content))
    }
    #[cfg(feature = "parallel")]
    fn write_outputs_parallel(&self, file_name: &str, content: &str) -> Result<(), JpmlError> {
        self.options
            .out_dir
            .par_iter()
            .try_for_each(|dir| write_output(dir, file_name, content))
    }
}
/// Reads a file as UTF-8 text, replacing invalid sequences.
///
/// Returns `None` when binary detection is enabled and flags the file.
fn read_text(path: &Path, binary_detection: BinaryDetection) -> Result<Option<String>, JpmlError> {
    let bytes = fs::read(path).map_err(|e| JpmlError::io(path, e))?;
    let head = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    let is_binary = match binary_detection {
        BinaryDetection::Simple => head.contains(&0),
        BinaryDetection::Accurate => content_inspector::inspect(head).is_binary(),
        BinaryDetection::None => false,
    };
    if is_binary {
        #[cfg(feature = "logging")]
        tracing::debug!("Binary file detected: {}", path.display());
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}
/// Output names must be a single plain component so every write stays inside
/// its output directory.
fn check_file_name(file_name: &str) -> Result<(), JpmlError> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(JpmlError::InvalidPath(format!(
            "output file name '{}' must be a plain file name",
            file_name
        ))),
    }
}
fn write_output(dir: &Path, file_name: &str, content: &str) -> Result<(), JpmlError> {
    let target = dir.join(file_name);
    fs::write(&target, content).map_err(|e| JpmlError::io(&target, e))?;
    #[cfg(feature = "logging")]
    tracing::trace!("Wrote {}", target.display());
    Ok(())
}
/// Creates each missing output directory. Parents are not created.
fn ensure_out_dirs(dirs: &[PathBuf]) -> Result<(), JpmlError> {
    for dir in dirs {
        if dir.exists() {
            continue;
        }
        #[cfg(feature = "logging")]
        tracing::debug!("Creating output directory: {}", dir.display());
        match fs::create_dir(dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(JpmlError::io(dir, e)),
        }
    }
    Ok(())
}
/// Walks every include root and writes the transformed files to every output
/// directory, using the strategy configured on `options`.
///
/// Returns one report per include root, in include order. The first failure
/// anywhere in any tree aborts the call; files written before it are kept.
///
/// # Errors
///
/// [`JpmlError::Config`] for an empty include or output list (raised before
/// any filesystem access), [`JpmlError::Walk`] for a bad exclude pattern,
/// [`JpmlError::InvalidPath`] when the name hook returns anything but a plain
/// file name, [`JpmlError::Io`] for listing, stat, read, write or directory creation
/// failures, and [`JpmlError::Xml`] for malformed XML in envelope mode.
pub fn generate(options: JpmlOptions) -> Result<Vec<RootReport>, JpmlError> {
    let options = options.normalize()?;
    let walker = Walker::new(&options)?;
    #[cfg(feature = "logging")]
    tracing::debug!(
        "Starting generate: {} include root(s), {} output dir(s)",
        options.include.len(),
        options.out_dir.len()
    );
    ensure_out_dirs(&options.out_dir)?;
    #[cfg(not(feature = "parallel"))]
    let reports: Result<Vec<RootReport>, JpmlError> = options
        .include
        .iter()
        .map(|root| walker.walk_root(root))
        .collect();
    #[cfg(feature = "parallel")]
    let reports: Result<Vec<RootReport>, JpmlError> = options
        .include
        .par_iter()
        .map(|root| walker.walk_root(root))
        .collect();
    reports
}
/// Like [`generate`], but always parses files as XML into the envelope.
///
/// Options still carrying the wrapper strategy get the default envelope.
pub fn parse_directories(mut options: JpmlOptions) -> Result<Vec<RootReport>, JpmlError> {
    if let Transform::Wrap { .. } = options.transform {
        options.transform = Transform::Envelope(Envelope::default());
    }
    generate(options)
}
