mod options;
mod sniffer;

use crate::{
    check::CheckKind,
    engine::{DefaultEngine, Engine, Gateway},
    input::{Input, Resolved},
    sniff::SniffBuffer,
    E,
};
use log::{debug, error, warn};
pub use options::{Options, ReadingStrategy, Tolerance};
pub use sniffer::Sniffer;
use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
    fs::File,
    path::Path,
    sync::Arc,
    time::Instant,
};

/// Results of several checks against one input.
pub type Report = BTreeMap<CheckKind, String>;

/// `Characterizer` turns an input and one or many requested checks into engine calls.
///
/// An input is resolved exactly once per request. That's essential for stream inputs, which can
/// be read only once: all checks of `characterize_many()` are done against the same bytes. The
/// results of the engine are returned as they are.
///
/// `Characterizer` itself doesn't keep an input; to work with a fixed input use `bind()`, which
/// gives a `Sniffer`.
///
/// # Example
///
/// ```no_run
/// use magicsniff::{CheckKind, Characterizer, Input};
/// use std::fs::File;
///
/// let characterizer = Characterizer::global().unwrap();
/// let mut input = Input::stream(File::open("/etc/hostname").unwrap());
/// let report = characterizer
///     .characterize_many(CheckKind::ALL, &mut input)
///     .unwrap();
/// for (kind, result) in report.iter() {
///     println!("{kind}: {result}");
/// }
/// // The stream has been consumed
/// assert!(characterizer.check_text(&mut input).is_err());
/// ```
pub struct Characterizer<G: Engine = DefaultEngine> {
    pub(crate) gateway: Arc<Gateway<G>>,
    pub(crate) window: usize,
    pub(crate) tolerance: Tolerance,
    pub(crate) reading_strategy: ReadingStrategy,
}

impl<G: Engine> Clone for Characterizer<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            window: self.window,
            tolerance: self.tolerance.clone(),
            reading_strategy: self.reading_strategy.clone(),
        }
    }
}

impl Characterizer<DefaultEngine> {
    /// Creates `Characterizer` with default options on top of the process-wide gateway.
    ///
    /// # Errors
    ///
    /// - `E::EngineUnavailable` if the default engine cannot be initialized.
    pub fn global() -> Result<Self, E> {
        Options::new().characterizer()
    }
}

impl<G: Engine> Characterizer<G> {
    pub fn window(&self) -> usize {
        self.window
    }

    /// Resolves the input and, if the strategy requires, reads the sniff window of a path input.
    fn prepare<'a>(&self, input: &'a mut Input) -> Result<Resolved<'a>, E> {
        let now = Instant::now();
        let resolved = match input.resolve(self.window)? {
            Resolved::Path(path) => match self.reading_strategy {
                ReadingStrategy::Direct => Resolved::Path(path),
                ReadingStrategy::Buffering => {
                    let file = File::open(path).map_err(|e| E::NotFound(path.to_path_buf(), e))?;
                    Resolved::Buffer(Cow::Owned(SniffBuffer::fill(file, self.window)?))
                }
                ReadingStrategy::MemoryMapped => Resolved::Buffer(Cow::Owned(
                    SniffBuffer::map(path, self.window)
                        .map_err(|e| E::NotFound(path.to_path_buf(), e))?,
                )),
            },
            resolved => resolved,
        };
        debug!(
            "input resolved into {} in {}µs",
            match &resolved {
                Resolved::Path(_) => "path",
                Resolved::Buffer(_) => "buffer",
            },
            now.elapsed().as_micros()
        );
        Ok(resolved)
    }

    fn classify(&self, kind: CheckKind, resolved: &Resolved<'_>) -> Result<String, E> {
        match resolved {
            Resolved::Path(path) => self.gateway.classify_path(kind, path),
            Resolved::Buffer(buffer) => self.gateway.classify_buffer(kind, buffer),
        }
    }

    /// Resolves the input and runs one check against it.
    ///
    /// # Errors
    ///
    /// - Any resolution error of `Input::resolve()`.
    /// - `E::Engine` if the engine rejects the input.
    pub fn characterize_one(&self, kind: CheckKind, input: &mut Input) -> Result<String, E> {
        let resolved = self.prepare(input)?;
        self.classify(kind, &resolved)
    }

    /// Resolves the input once and runs every requested check against it. Repeated kinds are
    /// checked once. An empty set of kinds gives an empty report and leaves the input untouched.
    ///
    /// If resolution fails, no check is done and the error is returned. Failures of single checks
    /// are handled according to `Tolerance`.
    pub fn characterize_many<I: IntoIterator<Item = CheckKind>>(
        &self,
        kinds: I,
        input: &mut Input,
    ) -> Result<Report, E> {
        let kinds: BTreeSet<CheckKind> = kinds.into_iter().collect();
        let mut report = Report::new();
        if kinds.is_empty() {
            return Ok(report);
        }
        let resolved = self.prepare(input)?;
        for kind in kinds {
            match self.classify(kind, &resolved) {
                Ok(result) => {
                    report.insert(kind, result);
                }
                Err(err) => match self.tolerance {
                    Tolerance::StopOnErrors => {
                        error!("{kind} check failed: {err}");
                        return Err(err);
                    }
                    Tolerance::LogErrors => {
                        warn!("{kind} check failed: {err}");
                    }
                    Tolerance::DoNotLogErrors => {}
                },
            }
        }
        Ok(report)
    }

    pub fn check_text(&self, input: &mut Input) -> Result<String, E> {
        self.characterize_one(CheckKind::Text, input)
    }

    pub fn check_mime(&self, input: &mut Input) -> Result<String, E> {
        self.characterize_one(CheckKind::Mime, input)
    }

    pub fn check_encoding(&self, input: &mut Input) -> Result<String, E> {
        self.characterize_one(CheckKind::Encoding, input)
    }

    /// Binds the input to a new `Sniffer`. A stream input is read right away, so the sniffer can
    /// run any number of checks against it.
    ///
    /// # Errors
    ///
    /// - `E::AlreadyConsumed`, `E::EmptyOrClosedStream` or `E::IO` for stream inputs.
    pub fn bind(&self, input: Input) -> Result<Sniffer<G>, E> {
        Sniffer::new(self.clone(), input)
    }
}

/// Returns the description of the input, using the process-wide engine.
pub fn check_text(input: &mut Input) -> Result<String, E> {
    Characterizer::global()?.check_text(input)
}

/// Returns the MIME type of the input, using the process-wide engine.
pub fn check_mime(input: &mut Input) -> Result<String, E> {
    Characterizer::global()?.check_mime(input)
}

/// Returns the encoding of the input, using the process-wide engine.
pub fn check_encoding(input: &mut Input) -> Result<String, E> {
    Characterizer::global()?.check_encoding(input)
}

/// Runs all given checks against the input, which is resolved only once.
pub fn characterize<I: IntoIterator<Item = CheckKind>>(
    kinds: I,
    input: &mut Input,
) -> Result<Report, E> {
    Characterizer::global()?.characterize_many(kinds, input)
}

/// Runs all checks against the file, using the process-wide engine.
pub fn characterize_path<P: AsRef<Path>>(path: P) -> Result<Report, E> {
    characterize(CheckKind::ALL, &mut Input::path(path)?)
}
