pub mod command;
#[cfg(feature = "libmagic")]
pub mod libmagic;

use crate::{check::CheckKind, sniff::SniffBuffer, E};
use log::debug;
use std::{
    error,
    path::Path,
    sync::{Arc, Mutex, OnceLock},
    time::Instant,
};

/// The engine used by the process-wide gateway.
#[cfg(feature = "libmagic")]
pub type DefaultEngine = libmagic::LibMagic;
/// The engine used by the process-wide gateway.
#[cfg(not(feature = "libmagic"))]
pub type DefaultEngine = command::FileCommand;

/// A trait for the native classification engine. The engine is the one who actually recognizes
/// the content; this crate only decides what to give it and when.
///
/// Engines are not expected to be reentrant, that's why all methods take `&mut self`. An engine
/// is never called directly; it's owned by a `Gateway`, which serializes all calls.
pub trait Engine: Send {
    /// The type of error that can occur during operations.
    type Error: error::Error + Into<E>;

    /// Initializes the engine: checks that it's present and loads its database.
    ///
    /// # Returns
    ///
    /// - `Result<Self, Self::Error>`: On success, returns a ready to use engine. On failure,
    ///   returns an error of type `Self::Error`.
    fn init() -> Result<Self, Self::Error>
    where
        Self: Sized;

    /// Classifies the file by its path.
    ///
    /// # Parameters
    ///
    /// - `kind`: The requested check.
    /// - `path`: A path to the file.
    ///
    /// # Returns
    ///
    /// - `Result<String, Self::Error>`: The engine's result as is, or the engine's diagnostic.
    fn by_path(&mut self, kind: CheckKind, path: &Path) -> Result<String, Self::Error>;

    /// Classifies the given bytes.
    ///
    /// # Parameters
    ///
    /// - `kind`: The requested check.
    /// - `bytes`: A non-empty prefix of the content.
    ///
    /// # Returns
    ///
    /// - `Result<String, Self::Error>`: The engine's result as is, or the engine's diagnostic.
    fn by_buffer(&mut self, kind: CheckKind, bytes: &[u8]) -> Result<String, Self::Error>;
}

/// One call into the engine.
enum Call<'a> {
    Path(&'a Path),
    Buffer(&'a [u8]),
}

/// `Gateway` owns an engine and makes sure that at most one call of any kind and any mode is
/// running against it at a time.
///
/// In production there is one gateway per process, see `Gateway::global()`. Gateways are shared
/// between threads with `Arc`. Each gateway has its own lock: calls going through two different
/// gateways aren't serialized against each other.
pub struct Gateway<G: Engine> {
    engine: Mutex<G>,
}

static GLOBAL: OnceLock<Arc<Gateway<DefaultEngine>>> = OnceLock::new();

impl Gateway<DefaultEngine> {
    /// Returns the process-wide gateway, initializing the default engine on first use.
    ///
    /// A failed initialization isn't remembered, the next call tries again.
    ///
    /// # Errors
    ///
    /// - `E::EngineUnavailable` if the engine cannot be initialized.
    pub fn global() -> Result<Arc<Self>, E> {
        if let Some(gateway) = GLOBAL.get() {
            return Ok(gateway.clone());
        }
        let gateway = Arc::new(Self::init()?);
        Ok(GLOBAL.get_or_init(move || gateway).clone())
    }
}

impl<G: Engine> Gateway<G> {
    /// Wraps an engine which was set up by the caller. The default engine should be reached
    /// through `Gateway::global()` instead; a second gateway around it would have a lock of its
    /// own.
    pub fn new(engine: G) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    /// Initializes an engine of type `G` and wraps it.
    ///
    /// # Errors
    ///
    /// - `E::EngineUnavailable` if the engine cannot be initialized.
    fn init() -> Result<Self, E> {
        let now = Instant::now();
        let engine = G::init().map_err(|err| E::EngineUnavailable(err.to_string()))?;
        debug!(
            "engine has been initialized in {}µs / {}ms",
            now.elapsed().as_micros(),
            now.elapsed().as_millis()
        );
        Ok(Self::new(engine))
    }

    pub fn classify_path(&self, kind: CheckKind, path: &Path) -> Result<String, E> {
        self.call(kind, Call::Path(path))
    }

    /// Classifies the buffer. An empty buffer is rejected without calling the engine.
    pub fn classify_buffer(&self, kind: CheckKind, buffer: &SniffBuffer) -> Result<String, E> {
        if buffer.is_empty() {
            return Err(E::Engine(String::from("cannot classify an empty buffer")));
        }
        self.call(kind, Call::Buffer(buffer.as_bytes()))
    }

    fn call(&self, kind: CheckKind, call: Call<'_>) -> Result<String, E> {
        let mut engine = self
            .engine
            .lock()
            .map_err(|e| E::PoisonError(e.to_string()))?;
        let now = Instant::now();
        let (mode, result) = match call {
            Call::Path(path) => ("path", engine.by_path(kind, path)),
            Call::Buffer(bytes) => ("buffer", engine.by_buffer(kind, bytes)),
        };
        drop(engine);
        debug!(
            "{kind} check by {mode} done in {}µs / {}ms",
            now.elapsed().as_micros(),
            now.elapsed().as_millis()
        );
        result.map_err(Into::into)
    }
}
