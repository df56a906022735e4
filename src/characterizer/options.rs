use super::Characterizer;
use crate::{
    engine::{DefaultEngine, Engine, Gateway},
    sniff::{DEFAULT_WINDOW, MAX_WINDOW},
    E,
};
use std::{mem, sync::Arc};

/// Defines what happens when one of several requested checks fails after the input has been
/// resolved. A failed resolution always fails the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Tolerance {
    /// Log the error and leave the failed check out of the report.
    LogErrors,
    /// Leave the failed check out of the report silently.
    DoNotLogErrors,
    /// Return the first error.
    #[default]
    StopOnErrors,
}

/// Defines how a path input reaches the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReadingStrategy {
    /// The path is given to the engine, which opens and reads the file itself.
    #[default]
    Direct,
    /// The sniff window is read from the file and given to the engine as a buffer.
    Buffering,
    /// The sniff window is mapped into memory and given to the engine as a buffer.
    MemoryMapped,
}

/// Configuration of `Characterizer`.
///
/// # Example
///
/// ```no_run
/// use magicsniff::{Input, Options, ReadingStrategy, Tolerance};
///
/// let characterizer = Options::new()
///     .window(1024)
///     .unwrap()
///     .tolerance(Tolerance::LogErrors)
///     .reading_strategy(ReadingStrategy::Buffering)
///     .characterizer()
///     .unwrap();
/// let mut input = Input::filename("/etc/hostname").unwrap();
/// println!("{}", characterizer.check_mime(&mut input).unwrap());
/// ```
pub struct Options<G: Engine = DefaultEngine> {
    pub(crate) window: usize,
    pub(crate) tolerance: Tolerance,
    pub(crate) reading_strategy: ReadingStrategy,
    pub(crate) gateway: Option<Arc<Gateway<G>>>,
}

impl Default for Options<DefaultEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl Options<DefaultEngine> {
    pub fn new() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            tolerance: Tolerance::default(),
            reading_strategy: ReadingStrategy::default(),
            gateway: None,
        }
    }

    /// Creates `Characterizer`. Without an explicitly set gateway the process-wide one is used.
    ///
    /// # Errors
    ///
    /// - `E::EngineUnavailable` if the default engine cannot be initialized.
    pub fn characterizer(&mut self) -> Result<Characterizer<DefaultEngine>, E> {
        if self.gateway.is_none() {
            self.gateway = Some(Gateway::global()?);
        }
        self.build()
    }
}

impl<G: Engine> Options<G> {
    /// Creates options bound to a custom gateway.
    pub fn with_gateway(gateway: Arc<Gateway<G>>) -> Self {
        Self {
            window: DEFAULT_WINDOW,
            tolerance: Tolerance::default(),
            reading_strategy: ReadingStrategy::default(),
            gateway: Some(gateway),
        }
    }

    /// Sets the sniff window: the maximum number of bytes read from streams and, with non-direct
    /// strategies, from files.
    ///
    /// # Errors
    ///
    /// - `E::InvalidWindow` if `window` is zero or bigger than `MAX_WINDOW`.
    pub fn window(&mut self, window: usize) -> Result<&mut Self, E> {
        if window == 0 || window > MAX_WINDOW {
            return Err(E::InvalidWindow(window, MAX_WINDOW));
        }
        self.window = window;
        Ok(self)
    }

    pub fn tolerance(&mut self, tolerance: Tolerance) -> &mut Self {
        self.tolerance = tolerance;
        self
    }

    pub fn reading_strategy(&mut self, reading_strategy: ReadingStrategy) -> &mut Self {
        self.reading_strategy = reading_strategy;
        self
    }

    pub fn gateway(&mut self, gateway: Arc<Gateway<G>>) -> &mut Self {
        self.gateway = Some(gateway);
        self
    }

    /// Creates `Characterizer` with the configured gateway.
    ///
    /// # Errors
    ///
    /// - `E::EngineUnavailable` if no gateway has been set.
    pub fn build(&mut self) -> Result<Characterizer<G>, E> {
        let gateway = self
            .gateway
            .take()
            .ok_or_else(|| E::EngineUnavailable(String::from("gateway isn't defined")))?;
        Ok(Characterizer {
            gateway,
            window: self.window,
            tolerance: mem::take(&mut self.tolerance),
            reading_strategy: mem::take(&mut self.reading_strategy),
        })
    }
}
