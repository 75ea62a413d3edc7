use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quiz::sentence;

#[derive(Embed)]
#[folder = "assets/questions/"]
struct QuestionAssets;

const DEFAULT_SET: &str = "default.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    #[serde(rename = "question")]
    pub template: String,
    pub options: Vec<String>,
    pub correct_answer: Vec<String>,
}

impl Question {
    pub fn blank_count(&self) -> usize {
        sentence::blank_count(&self.template)
    }

    pub fn fragments(&self) -> Vec<&str> {
        sentence::parse_sentence(&self.template)
    }

    pub fn has_option(&self, word: &str) -> bool {
        self.options.iter().any(|o| o == word)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionSetError {
    #[error("question set is empty")]
    Empty,
    #[error("duplicate question id {0}")]
    DuplicateId(String),
    #[error("question {id} has {blanks} blanks but {answers} correct answers")]
    BlankCountMismatch {
        id: String,
        blanks: usize,
        answers: usize,
    },
    #[error("question {id}: correct answer {word:?} is not among the options")]
    AnswerNotInOptions { id: String, word: String },
}

/// On-disk shapes accepted for a question file: a bare list, or the
/// `{ "data": { "questions": [...] } }` envelope returned by the quiz API.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionFile {
    Bare(Vec<Question>),
    Envelope { data: EnvelopeData },
}

#[derive(Deserialize)]
struct EnvelopeData {
    questions: Vec<Question>,
}

/// Ordered, validated list of questions. Never mutated after load.
#[derive(Clone, Debug)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(q.question_id.as_str()) {
                return Err(QuestionSetError::DuplicateId(q.question_id.clone()));
            }
            let blanks = q.blank_count();
            if blanks != q.correct_answer.len() {
                return Err(QuestionSetError::BlankCountMismatch {
                    id: q.question_id.clone(),
                    blanks,
                    answers: q.correct_answer.len(),
                });
            }
            if let Some(word) = q.correct_answer.iter().find(|w| !q.has_option(w)) {
                return Err(QuestionSetError::AnswerNotInOptions {
                    id: q.question_id.clone(),
                    word: word.clone(),
                });
            }
        }
        Ok(Self { questions })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: QuestionFile = serde_json::from_str(json)?;
        let questions = match file {
            QuestionFile::Bare(questions) => questions,
            QuestionFile::Envelope { data } => data.questions,
        };
        Ok(Self::new(questions)?)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading question file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("parsing question file {}", path.display()))
    }

    /// The question set compiled into the binary.
    pub fn bundled() -> Result<Self> {
        let file = QuestionAssets::get(DEFAULT_SET).context("bundled question set missing")?;
        let content = std::str::from_utf8(file.data.as_ref())?;
        Self::from_json(content)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn find(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.question_id == question_id)
    }

    pub fn position(&self, question_id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.question_id == question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::sentence::BLANK_MARKER;

    fn question(id: &str, blanks: usize, options: &[&str], correct: &[&str]) -> Question {
        let mut template = String::from("Start");
        for _ in 0..blanks {
            template.push(' ');
            template.push_str(BLANK_MARKER);
        }
        Question {
            question_id: id.to_string(),
            template,
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: correct.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_bundled_set_is_valid() {
        let set = QuestionSet::bundled().unwrap();
        assert_eq!(set.len(), 10);
        for q in set.iter() {
            assert_eq!(q.blank_count(), q.correct_answer.len());
        }
    }

    #[test]
    fn test_empty_set_rejected() {
        assert_eq!(QuestionSet::new(Vec::new()).unwrap_err(), QuestionSetError::Empty);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = QuestionSet::new(vec![
            question("a", 1, &["x"], &["x"]),
            question("a", 1, &["y"], &["y"]),
        ])
        .unwrap_err();
        assert_eq!(err, QuestionSetError::DuplicateId("a".to_string()));
    }

    #[test]
    fn test_blank_count_mismatch_rejected() {
        let err = QuestionSet::new(vec![question("a", 2, &["x", "y"], &["x"])]).unwrap_err();
        assert!(matches!(err, QuestionSetError::BlankCountMismatch { blanks: 2, answers: 1, .. }));
    }

    #[test]
    fn test_answer_outside_options_rejected() {
        let err = QuestionSet::new(vec![question("a", 1, &["x"], &["z"])]).unwrap_err();
        assert!(matches!(
            err,
            QuestionSetError::AnswerNotInOptions { ref word, .. } if word == "z"
        ));
    }

    #[test]
    fn test_parses_envelope_and_bare_list() {
        let question = serde_json::json!({
            "questionId": "q1",
            "question": format!("A {BLANK_MARKER}"),
            "questionType": "text",
            "answerType": "options",
            "options": ["x", "y"],
            "correctAnswer": ["x"],
        });
        let bare = serde_json::json!([question.clone()]).to_string();
        let envelope = serde_json::json!({
            "status": "SUCCESS",
            "data": { "testId": "t", "questions": [question] },
        })
        .to_string();
        assert_eq!(QuestionSet::from_json(&bare).unwrap().len(), 1);
        let set = QuestionSet::from_json(&envelope).unwrap();
        assert_eq!(set.position("q1"), Some(0));
        assert!(set.find("missing").is_none());
    }
}
