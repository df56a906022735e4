mod error;

use super::Engine;
use crate::check::CheckKind;
pub use error::E;
use log::{debug, warn};
use std::{
    ffi::OsStr,
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

/// Arguments of the utility for each kind of check.
fn args(kind: CheckKind) -> &'static [&'static str] {
    match kind {
        CheckKind::Text => &["-b"],
        CheckKind::Mime => &["-b", "--mime-type"],
        CheckKind::Encoding => &["-b", "--mime-encoding"],
    }
}

/// Engine which delegates to the `file(1)` utility, the command line front-end of libmagic.
///
/// In path mode the path is given as an argument; in buffer mode the bytes are written into the
/// utility's stdin (`file -`).
pub struct FileCommand {
    binary: PathBuf,
}

impl FileCommand {
    /// Uses the given binary instead of looking for `file` in `PATH`. Unlike `init()`, doesn't
    /// check the binary.
    pub fn with_binary<P: AsRef<Path>>(binary: P) -> Self {
        Self {
            binary: binary.as_ref().to_path_buf(),
        }
    }

    fn command(&self, kind: CheckKind) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args(args(kind))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    fn output(&self, output: Output) -> Result<String, E> {
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(E::Failed(if stderr.is_empty() {
                format!("{} without stderr output", output.status)
            } else {
                stderr
            }));
        }
        let stdout =
            String::from_utf8(output.stdout).map_err(|e| E::InvalidOutput(e.to_string()))?;
        let result = stdout.trim_end_matches(['\n', '\r']).to_string();
        if result.starts_with("cannot open") {
            return Err(E::CannotOpen(result));
        }
        Ok(result)
    }
}

impl Engine for FileCommand {
    type Error = E;

    fn init() -> Result<Self, E> {
        let engine = Self::with_binary("file");
        let output = Command::new(&engine.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()?;
        if !output.status.success() {
            return Err(E::Failed(format!(
                "{} --version: {}",
                engine.binary.display(),
                output.status
            )));
        }
        debug!(
            "using {}",
            String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or_default()
        );
        Ok(engine)
    }

    fn by_path(&mut self, kind: CheckKind, path: &Path) -> Result<String, E> {
        let output = self
            .command(kind)
            .arg("--")
            .arg(path.as_os_str())
            .stdin(Stdio::null())
            .output()?;
        self.output(output)
    }

    fn by_buffer(&mut self, kind: CheckKind, bytes: &[u8]) -> Result<String, E> {
        let mut child = self
            .command(kind)
            .arg(OsStr::new("-"))
            .stdin(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // The utility may stop reading once it has seen enough
            if let Err(err) = stdin.write_all(bytes) {
                if err.kind() != io::ErrorKind::BrokenPipe {
                    warn!("fail to write into file utility: {err}");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(E::IOError(err));
                }
            }
        }
        self.output(child.wait_with_output()?)
    }
}

#[cfg(test)]
mod test {
    use super::{args, FileCommand};
    use crate::{check::CheckKind, engine::Engine, E};
    use std::{path::Path, process::Output};

    /// Output of the utility as if it exited with `code`.
    #[cfg(unix)]
    fn output(code: i32, stdout: &str, stderr: &str) -> Output {
        use std::{os::unix::process::ExitStatusExt, process::ExitStatus};
        Output {
            status: ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn arguments() {
        assert_eq!(args(CheckKind::Text), &["-b"]);
        assert_eq!(args(CheckKind::Mime), &["-b", "--mime-type"]);
        assert_eq!(args(CheckKind::Encoding), &["-b", "--mime-encoding"]);
    }

    #[test]
    fn missing_binary() {
        let mut engine = FileCommand::with_binary("/this/binary/probably/does/not/exist");
        let err: E = engine
            .by_path(CheckKind::Text, Path::new("/"))
            .expect_err("binary doesn't exist")
            .into();
        assert!(matches!(err, E::Engine(msg) if msg.contains("not installed")));
    }

    #[cfg(unix)]
    #[test]
    fn successful_output() {
        let engine = FileCommand::with_binary("file");
        assert_eq!(
            engine.output(output(0, "ASCII text\n", "")).ok(),
            Some(String::from("ASCII text"))
        );
        assert_eq!(
            engine.output(output(0, "text/plain\r\n", "")).ok(),
            Some(String::from("text/plain"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn cannot_open_output() {
        let engine = FileCommand::with_binary("file");
        let text = "cannot open `/no/such/file' (No such file or directory)";
        match engine.output(output(0, &format!("{text}\n"), "")) {
            Err(super::E::CannotOpen(msg)) => assert_eq!(msg, text),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn failed_output() {
        let engine = FileCommand::with_binary("file");
        match engine.output(output(1, "", "file: bad option\n")) {
            Err(super::E::Failed(msg)) => assert_eq!(msg, "file: bad option"),
            other => panic!("unexpected result: {other:?}"),
        }
        match engine.output(output(2, "", "")) {
            Err(super::E::Failed(msg)) => assert!(msg.contains("without stderr output")),
            other => panic!("unexpected result: {other:?}"),
        }
        // Empty output of a successful run isn't an error on its own
        assert_eq!(engine.output(output(0, "", "")).ok(), Some(String::new()));
    }
}
