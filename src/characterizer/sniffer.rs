use super::{Characterizer, Report};
use crate::{
    check::CheckKind,
    engine::{DefaultEngine, Engine},
    input::Input,
    E,
};
use log::debug;
use std::{io::Read, path::Path};

/// `Sniffer` keeps one input and runs checks against it.
///
/// Stream inputs are read into a buffer when they are bound, which makes all checks repeatable:
/// `check_text()`, `check_mime()` and `check_encoding()` can be called one after another on a
/// sniffer created from a stream. Path inputs are verified again on each check.
pub struct Sniffer<G: Engine = DefaultEngine> {
    characterizer: Characterizer<G>,
    input: Input,
}

impl Sniffer<DefaultEngine> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, E> {
        let input = Input::path(path)?;
        Characterizer::global()?.bind(input)
    }

    pub fn from_filename(filename: &str) -> Result<Self, E> {
        let input = Input::filename(filename)?;
        Characterizer::global()?.bind(input)
    }

    pub fn from_stream<R: Read + Send + 'static>(stream: R) -> Result<Self, E> {
        Characterizer::global()?.bind(Input::stream(stream))
    }

    pub fn from_buffer<B: Into<Vec<u8>>>(bytes: B) -> Result<Self, E> {
        let characterizer = Characterizer::global()?;
        let input = Input::buffer(bytes, characterizer.window());
        characterizer.bind(input)
    }
}

impl<G: Engine> Sniffer<G> {
    pub(crate) fn new(characterizer: Characterizer<G>, mut input: Input) -> Result<Self, E> {
        input.materialize(characterizer.window())?;
        debug!("sniffer has been bound to {input:?}");
        Ok(Self {
            characterizer,
            input,
        })
    }

    /// Replaces the bound input. If the new input cannot be materialized, the previous one is
    /// kept.
    pub fn rebind(&mut self, mut input: Input) -> Result<&mut Self, E> {
        input.materialize(self.characterizer.window())?;
        debug!("sniffer has been rebound to {input:?}");
        self.input = input;
        Ok(self)
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn characterize(&mut self, kind: CheckKind) -> Result<String, E> {
        self.characterizer.characterize_one(kind, &mut self.input)
    }

    pub fn characterize_many<I: IntoIterator<Item = CheckKind>>(
        &mut self,
        kinds: I,
    ) -> Result<Report, E> {
        self.characterizer.characterize_many(kinds, &mut self.input)
    }

    pub fn check_text(&mut self) -> Result<String, E> {
        self.characterize(CheckKind::Text)
    }

    pub fn check_mime(&mut self) -> Result<String, E> {
        self.characterize(CheckKind::Mime)
    }

    pub fn check_encoding(&mut self) -> Result<String, E> {
        self.characterize(CheckKind::Encoding)
    }
}
