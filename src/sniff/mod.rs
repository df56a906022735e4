mod mapping;

use std::{
    io::{self, Read},
    ops::Deref,
    path::Path,
};

/// The default size of the sniff window in bytes. It's enough for the engine to make a reliable
/// determination for most formats.
pub const DEFAULT_WINDOW: usize = 4096;
/// The largest sniff window which can be configured.
pub const MAX_WINDOW: usize = 65536;

/// `SniffBuffer` holds a bounded prefix of some input, which is given to the engine in buffer
/// mode. The length of the buffer never exceeds the window it was created with. If the source
/// produced fewer bytes, the buffer holds exactly the bytes which were read (zero included).
///
/// A buffer is immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffBuffer {
    bytes: Vec<u8>,
    window: usize,
}

impl SniffBuffer {
    /// Reads up to `window` bytes from `reader` and closes it.
    ///
    /// A short or empty read isn't an error; whether such a buffer is usable is decided later
    /// by the consumer.
    ///
    /// # Parameters
    ///
    /// - `reader`: A source of bytes. It's taken by value and dropped (closed) on every exit
    ///   path, including a failed read.
    /// - `window`: The maximum number of bytes to read.
    ///
    /// # Returns
    ///
    /// - `io::Result<SniffBuffer>`: The filled buffer or the reading error.
    pub fn fill<R: Read>(mut reader: R, window: usize) -> io::Result<Self> {
        let mut bytes = Vec::with_capacity(window);
        reader
            .by_ref()
            .take(window as u64)
            .read_to_end(&mut bytes)?;
        drop(reader);
        Ok(Self { bytes, window })
    }

    /// Wraps already available bytes. Bytes beyond `window` are dropped.
    pub fn from_bytes<B: Into<Vec<u8>>>(bytes: B, window: usize) -> Self {
        let mut bytes = bytes.into();
        bytes.truncate(window);
        Self { bytes, window }
    }

    /// Maps the first `window` bytes of the file into memory and copies them into a new buffer.
    pub fn map<P: AsRef<Path>>(path: P, window: usize) -> io::Result<Self> {
        Ok(Self {
            bytes: mapping::prefix(path.as_ref(), window)?,
            window,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Deref for SniffBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for SniffBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod test {
    use super::SniffBuffer;
    use crate::test::usecase::UseCase;
    use std::{
        io::{self, Read},
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
    };

    /// Gives bytes by small portions and reports when it has been dropped.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        closed: Arc<AtomicBool>,
        fail: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "broken source"));
            }
            let len = 3.min(buffer.len()).min(self.data.len() - self.pos);
            buffer[..len].copy_from_slice(&self.data[self.pos..self.pos + len]);
            self.pos += len;
            Ok(len)
        }
    }

    impl Drop for Trickle {
        fn drop(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    fn trickle(data: &[u8], fail: bool) -> (Trickle, Arc<AtomicBool>) {
        let closed = Arc::new(AtomicBool::new(false));
        (
            Trickle {
                data: data.to_vec(),
                pos: 0,
                closed: closed.clone(),
                fail,
            },
            closed,
        )
    }

    #[test]
    fn bounded_by_window() -> io::Result<()> {
        let (reader, closed) = trickle(&[7u8; 100], false);
        let buffer = SniffBuffer::fill(reader, 16)?;
        assert_eq!(buffer.len(), 16);
        assert_eq!(buffer.window(), 16);
        assert!(closed.load(Ordering::SeqCst));
        Ok(())
    }

    #[test]
    fn short_and_empty_reads() -> io::Result<()> {
        let (reader, _) = trickle(b"0123456789", false);
        let buffer = SniffBuffer::fill(reader, 4096)?;
        assert_eq!(buffer.as_bytes(), b"0123456789");
        let (reader, closed) = trickle(&[], false);
        let buffer = SniffBuffer::fill(reader, 4096)?;
        assert!(buffer.is_empty());
        assert!(closed.load(Ordering::SeqCst));
        Ok(())
    }

    #[test]
    fn closed_on_failure() {
        let (reader, closed) = trickle(b"abc", true);
        assert!(SniffBuffer::fill(reader, 4096).is_err());
        assert!(closed.load(Ordering::SeqCst));
    }

    #[test]
    fn truncated_bytes() {
        let buffer = SniffBuffer::from_bytes(vec![1u8; 10], 4);
        assert_eq!(buffer.as_bytes(), &[1u8; 4]);
        let buffer = SniffBuffer::from_bytes(&b"ab"[..], 4);
        assert_eq!(buffer.as_bytes(), b"ab");
    }

    #[test]
    fn mapped_prefix() -> io::Result<()> {
        let usecase = UseCase::with(&[b"0123456789".to_vec(), Vec::new()])?;
        let buffer = SniffBuffer::map(&usecase.files[0], 4)?;
        assert_eq!(buffer.as_bytes(), b"0123");
        let buffer = SniffBuffer::map(&usecase.files[0], 4096)?;
        assert_eq!(buffer.as_bytes(), b"0123456789");
        let buffer = SniffBuffer::map(&usecase.files[1], 4096)?;
        assert!(buffer.is_empty());
        usecase.clean()?;
        Ok(())
    }
}
