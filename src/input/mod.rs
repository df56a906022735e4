use crate::{sniff::SniffBuffer, E};
use log::debug;
use std::{
    borrow::Cow,
    fmt,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

/// State of a stream-backed input.
///
/// A stream can be read only once. `Resolved` and `Failed` are both terminal: any further
/// attempt to resolve the stream fails with `E::AlreadyConsumed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unresolved,
    Resolved,
    Failed,
}

/// Materialized form of an `Input`, ready to be given to the engine.
#[derive(Debug)]
pub enum Resolved<'a> {
    /// Verified path for a path-mode call.
    Path(&'a Path),
    /// Bytes for a buffer-mode call.
    Buffer(Cow<'a, SniffBuffer>),
}

/// `Input` describes where the bytes to classify come from.
///
/// - `Path`: a file on disk. Readability is checked on creation and checked again on each
///   resolution, because the file could be removed or changed in between.
/// - `Stream`: a single-read source. It's read once (up to the sniff window) and closed right
///   after; the second resolution fails with `E::AlreadyConsumed`.
/// - `Buffer`: bytes which are already available; can be resolved any number of times.
pub enum Input {
    Path(PathBuf),
    Stream {
        stream: Option<Box<dyn Read + Send>>,
        state: State,
    },
    Buffer(SniffBuffer),
}

fn readable(path: &Path) -> Result<(), E> {
    File::open(path).map_err(|err| (path.to_path_buf(), err))?;
    Ok(())
}

/// Reads the stream into a buffer (once) and marks the stream as consumed. The stream is
/// closed on every exit path.
fn consume(
    stream: &mut Option<Box<dyn Read + Send>>,
    state: &mut State,
    window: usize,
) -> Result<SniffBuffer, E> {
    if *state != State::Unresolved {
        return Err(E::AlreadyConsumed);
    }
    let source = stream.take().ok_or(E::AlreadyConsumed)?;
    *state = State::Failed;
    let buffer = SniffBuffer::fill(source, window)?;
    if buffer.is_empty() {
        return Err(E::EmptyOrClosedStream);
    }
    *state = State::Resolved;
    debug!("stream has been read into sniff buffer ({} bytes)", buffer.len());
    Ok(buffer)
}

impl Input {
    /// Creates a path input.
    ///
    /// # Errors
    ///
    /// - `E::NotFound` if the path doesn't exist or cannot be read.
    pub fn path<P: AsRef<Path>>(path: P) -> Result<Self, E> {
        let path = path.as_ref();
        readable(path)?;
        Ok(Self::Path(path.to_path_buf()))
    }

    pub fn filename(filename: &str) -> Result<Self, E> {
        Self::path(Path::new(filename))
    }

    /// Wraps a stream. Nothing is read until the input is resolved or materialized.
    pub fn stream<R: Read + Send + 'static>(stream: R) -> Self {
        Self::Stream {
            stream: Some(Box::new(stream)),
            state: State::Unresolved,
        }
    }

    /// Wraps bytes which were read before. Everything after `window` is ignored.
    pub fn buffer<B: Into<Vec<u8>>>(bytes: B, window: usize) -> Self {
        Self::Buffer(SniffBuffer::from_bytes(bytes, window))
    }

    /// Returns the state of a stream input; `None` for other kinds of input.
    pub fn state(&self) -> Option<State> {
        if let Self::Stream { state, .. } = self {
            Some(*state)
        } else {
            None
        }
    }

    /// `true` once a stream input has been read (successfully or not). Always `false` for
    /// path and buffer inputs.
    pub fn is_consumed(&self) -> bool {
        matches!(self.state(), Some(State::Resolved) | Some(State::Failed))
    }

    /// Resolves the input into the form which can be given to the engine.
    ///
    /// # Parameters
    ///
    /// - `window`: The sniff window used for stream inputs.
    ///
    /// # Errors
    ///
    /// - `E::NotFound` if a path input isn't readable anymore.
    /// - `E::AlreadyConsumed` if a stream input was resolved before.
    /// - `E::EmptyOrClosedStream` if a stream gives no bytes.
    /// - `E::IO` if reading of a stream fails.
    pub fn resolve(&mut self, window: usize) -> Result<Resolved<'_>, E> {
        match self {
            Self::Path(path) => {
                readable(path)?;
                Ok(Resolved::Path(path))
            }
            Self::Stream { stream, state } => {
                Ok(Resolved::Buffer(Cow::Owned(consume(stream, state, window)?)))
            }
            Self::Buffer(buffer) => Ok(Resolved::Buffer(Cow::Borrowed(buffer))),
        }
    }

    /// Turns a stream input into a buffer input, which makes the input repeatable. Other kinds
    /// of input are left untouched.
    ///
    /// # Errors
    ///
    /// The same as `resolve()` for stream inputs.
    pub fn materialize(&mut self, window: usize) -> Result<&mut Self, E> {
        if let Self::Stream { stream, state } = self {
            let buffer = consume(stream, state, window)?;
            *self = Self::Buffer(buffer);
        }
        Ok(self)
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Stream { state, .. } => f.debug_struct("Stream").field("state", state).finish(),
            Self::Buffer(buffer) => f.debug_tuple("Buffer").field(&buffer.len()).finish(),
        }
    }
}
