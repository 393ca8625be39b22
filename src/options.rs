use crate::error::JpmlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Predicate deciding whether a discovered file is processed.
pub type FilterFn = Arc<dyn Fn(&Path) -> bool + Send + Sync>;
/// Maps an input basename to the output basename.
pub type FileNameFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
/// Maps an input basename to the content key; `None` drops the key.
pub type KeyFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;
/// Wraps raw file text given its content key.
pub type WrapperFn = Arc<dyn Fn(&str, Option<&str>) -> String + Send + Sync>;

pub const DEFAULT_INTRO: &str = "loadJpml(";
pub const DEFAULT_OUTRO: &str = ");";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    Simple,
    Accurate,
    None,
}

/// Strings placed around the JSON payload in envelope mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub intro: String,
    pub outro: String,
}
impl Default for Envelope {
    fn default() -> Self {
        Self {
            intro: DEFAULT_INTRO.to_string(),
            outro: DEFAULT_OUTRO.to_string(),
        }
    }
}

/// How file text becomes output text.
#[derive(Clone, Serialize, Deserialize)]
pub enum Transform {
    /// Pass the raw text through `wrapper`, or unchanged when absent.
    Wrap {
        #[serde(skip)]
        wrapper: Option<WrapperFn>,
    },
    /// Parse the text as XML and embed the JSON in the envelope.
    Envelope(Envelope),
}
impl Default for Transform {
    fn default() -> Self {
        Transform::Wrap { wrapper: None }
    }
}
impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Wrap { wrapper } => f
                .debug_struct("Wrap")
                .field("wrapper", &wrapper.as_ref().map(|_| "<fn>"))
                .finish(),
            Transform::Envelope(envelope) => f.debug_tuple("Envelope").field(envelope).finish(),
        }
    }
}

/// Per-file hooks. None of them are serializable.
#[derive(Clone, Default)]
pub struct Hooks {
    pub filter: Option<FilterFn>,
    pub file_name: Option<FileNameFn>,
    pub key: Option<KeyFn>,
}
impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("filter", &self.filter.is_some())
            .field("file_name", &self.file_name.is_some())
            .field("key", &self.key.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JpmlOptions {
    pub include: Vec<PathBuf>,
    pub out_dir: Vec<PathBuf>,
    pub exclude_patterns: Vec<String>,
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    pub binary_detection: BinaryDetection,
    pub transform: Transform,
    #[serde(skip)]
    pub hooks: Hooks,
}
impl Default for JpmlOptions {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            out_dir: Vec::new(),
            exclude_patterns: Vec::new(),
            max_depth: None,
            follow_links: false,
            binary_detection: BinaryDetection::None,
            transform: Transform::default(),
            hooks: Hooks::default(),
        }
    }
}
impl JpmlOptions {
    /// Rejects empty `include`/`out_dir`. Touches no files.
    pub fn validate(&self) -> Result<(), JpmlError> {
        if self.include.is_empty() || self.include.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(JpmlError::Config("invalid include directories".into()));
        }
        if self.out_dir.is_empty() || self.out_dir.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(JpmlError::Config("invalid output directories".into()));
        }
        Ok(())
    }

    /// Validates and resolves every include root and output directory against
    /// the current directory.
    pub(crate) fn normalize(mut self) -> Result<Self, JpmlError> {
        self.validate()?;
        if self
            .include
            .iter()
            .chain(self.out_dir.iter())
            .any(|p| !p.is_absolute())
        {
            let cwd = std::env::current_dir().map_err(|e| JpmlError::io(".", e))?;
            for path in self.include.iter_mut().chain(self.out_dir.iter_mut()) {
                if !path.is_absolute() {
                    *path = cwd.join(&*path);
                }
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Default)]
pub struct JpmlBuilder {
    options: JpmlOptions,
}
impl JpmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn include(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.include.push(dir.into());
        self
    }
    pub fn includes<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.options.include.extend(dirs.into_iter().map(Into::into));
        self
    }
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.out_dir.push(dir.into());
        self
    }
    pub fn out_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.options.out_dir.extend(dirs.into_iter().map(Into::into));
        self
    }
    pub fn filter(mut self, f: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        self.options.hooks.filter = Some(Arc::new(f));
        self
    }
    pub fn file_name(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.options.hooks.file_name = Some(Arc::new(f));
        self
    }
    pub fn key(mut self, f: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.options.hooks.key = Some(Arc::new(f));
        self
    }
    /// Selects the wrapper strategy with a custom wrapper.
    pub fn wrapper(
        mut self,
        f: impl Fn(&str, Option<&str>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.options.transform = Transform::Wrap {
            wrapper: Some(Arc::new(f)),
        };
        self
    }
    /// Selects the envelope strategy.
    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.options.transform = Transform::Envelope(envelope);
        self
    }
    /// Sets the envelope intro, switching to the envelope strategy if needed.
    pub fn intro(self, intro: impl Into<String>) -> Self {
        let intro = intro.into();
        self.with_envelope(|envelope| envelope.intro = intro)
    }
    /// Sets the envelope outro, switching to the envelope strategy if needed.
    pub fn outro(self, outro: impl Into<String>) -> Self {
        let outro = outro.into();
        self.with_envelope(|envelope| envelope.outro = outro)
    }
    pub fn exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.exclude_patterns = patterns;
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }
    pub fn no_limit_depth(mut self) -> Self {
        self.options.max_depth = None;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn build(self) -> Result<JpmlOptions, JpmlError> {
        self.options.validate()?;
        Ok(self.options)
    }

    fn with_envelope(mut self, edit: impl FnOnce(&mut Envelope)) -> Self {
        let mut envelope = match std::mem::take(&mut self.options.transform) {
            Transform::Envelope(envelope) => envelope,
            Transform::Wrap { .. } => Envelope::default(),
        };
        edit(&mut envelope);
        self.options.transform = Transform::Envelope(envelope);
        self
    }
}
