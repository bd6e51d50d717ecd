use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::quiz::Question;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read questions from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse questions: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("answer of question \"{question}\" is not exactly one of its options")]
    AnswerNotInOptions { question: String },
    #[error("question source is empty")]
    Empty,
}

/// Supplies the full, ordered question pool a game draws from.
pub trait QuestionSource {
    fn load(&self) -> Result<Vec<Question>, SourceError>;
}

/// Reads a JSON array of question records from disk, once per call.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionSource for JsonFileSource {
    fn load(&self) -> Result<Vec<Question>, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_questions(BufReader::new(file))
    }
}

/// A fixed in-memory pool.
impl QuestionSource for Vec<Question> {
    fn load(&self) -> Result<Vec<Question>, SourceError> {
        validate(self.clone())
    }
}

pub fn parse_questions(reader: impl Read) -> Result<Vec<Question>, SourceError> {
    let questions: Vec<Question> = serde_json::from_reader(reader)?;
    validate(questions)
}

fn validate(questions: Vec<Question>) -> Result<Vec<Question>, SourceError> {
    if questions.is_empty() {
        return Err(SourceError::Empty);
    }
    if let Some(bad) = questions.iter().find(|q| !q.has_valid_answer()) {
        return Err(SourceError::AnswerNotInOptions {
            question: bad.text.clone(),
        });
    }
    Ok(questions)
}
