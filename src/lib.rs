#![doc = include_str!("../README.md")]

pub mod characterizer;
mod check;
pub mod engine;
mod error;
pub mod input;
pub mod sniff;
#[cfg(test)]
pub(crate) mod test;

pub use characterizer::{
    characterize, characterize_path, check_encoding, check_mime, check_text, Characterizer,
    Options, ReadingStrategy, Report, Sniffer, Tolerance,
};
pub use check::CheckKind;
pub use engine::{DefaultEngine, Engine, Gateway};
pub use error::E;
pub use input::{Input, State};
pub use sniff::SniffBuffer;
