use memmap2::MmapOptions;
use std::{fs::File, io, path::Path};

/// Maps at most `window` leading bytes of the file and copies them out. The mapping and the
/// file handle are released before returning.
pub(crate) fn prefix(path: &Path, window: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let md = file.metadata()?;
    if !md.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} isn't a regular file", path.display()),
        ));
    }
    let len = usize::try_from(md.len()).unwrap_or(usize::MAX).min(window);
    if len == 0 {
        // Zero-length mappings are rejected by the OS
        return Ok(Vec::new());
    }
    let mmap = unsafe { MmapOptions::new().len(len).map(&file) }?;
    Ok(mmap[..].to_vec())
}
