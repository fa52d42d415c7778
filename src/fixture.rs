use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ddm::{Coordinate, Ddm};
use crate::error::FixtureError;

/// Coordinates paired positionally with their reference answers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawExampleSet")]
pub struct ExampleSet {
    examples: Vec<Coordinate>,
    answers: Vec<Ddm>,
}

#[derive(Deserialize)]
struct RawExampleSet {
    examples: Vec<Coordinate>,
    answers: Vec<Ddm>,
}

impl TryFrom<RawExampleSet> for ExampleSet {
    type Error = FixtureError;

    fn try_from(raw: RawExampleSet) -> Result<Self, Self::Error> {
        Self::new(raw.examples, raw.answers)
    }
}

impl ExampleSet {
    pub fn new(examples: Vec<Coordinate>, answers: Vec<Ddm>) -> Result<Self, FixtureError> {
        if examples.len() != answers.len() {
            return Err(FixtureError::LengthMismatch {
                examples: examples.len(),
                answers: answers.len(),
            });
        }
        Ok(Self { examples, answers })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: absolute(path),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FixtureError> {
        let path = path.as_ref();
        let text = serde_json::to_string(self)?;
        fs::write(path, text).map_err(|source| FixtureError::Io {
            path: absolute(path),
            source,
        })
    }

    pub fn examples(&self) -> &[Coordinate] {
        &self.examples
    }

    pub fn answers(&self) -> &[Ddm] {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &Ddm)> {
        self.examples.iter().copied().zip(self.answers.iter())
    }
}

/// Relative paths are reported joined onto the working directory they were resolved against.
fn absolute(path: &Path) -> PathBuf {
    if path.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            return cwd.join(path);
        }
    }
    path.to_path_buf()
}
