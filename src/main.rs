use clap::Parser;
use magicsniff::{characterize_path, CheckKind, Input};
use std::{path::PathBuf, process::ExitCode};

#[derive(Parser)]
#[command(
    name = "magicsniff",
    about = "Prints description, MIME type and encoding of a file",
    version,
    long_about = None
)]
struct Cli {
    /// Path to an existing file.
    path: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    println!("magicsniff: libmagic front-end...");
    let Some(path) = cli.path.filter(|path| Input::path(path).is_ok()) else {
        println!("First argument should be the path to an existing filename.");
        return ExitCode::SUCCESS;
    };
    println!("Characteristics for: {}", path.display());
    match characterize_path(&path) {
        Ok(report) => {
            for (kind, label) in [
                (CheckKind::Text, "Textual representation"),
                (CheckKind::Mime, "Magic mime type"),
                (CheckKind::Encoding, "Encoding"),
            ] {
                if let Some(result) = report.get(&kind) {
                    println!("{label}: {result}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Fail to characterize: {err}");
            ExitCode::FAILURE
        }
    }
}
