//! Quiz data as delivered by the content source

use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::error::QuizError;

/// Topic used when the content source omits one
pub const DEFAULT_TOPIC: &str = "Untitled quiz";

/// Difficulty requested from the content source
///
/// Unknown names deserialize as medium.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a difficulty, falling back to medium for anything unknown
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            _ => Self::Medium,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        Self::parse_lenient(&s)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    /// The question text
    pub question: String,

    /// Answer options, in display order
    pub options: Vec<String>,

    /// Index of the correct option
    #[serde(rename = "correct")]
    pub correct_index: usize,

    /// Why the correct option is correct
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Create a question without an explanation
    pub fn new(
        question: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_index: usize,
    ) -> Self {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_index,
            explanation: None,
        }
    }

    /// Attach an explanation
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Text of the correct option
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }

    /// Shuffle the options in place, keeping `correct_index` pointing at the same text
    pub fn shuffle_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.options.len()).collect();
        order.shuffle(rng);

        let shuffled: Vec<String> = order.iter().map(|&i| self.options[i].clone()).collect();
        if let Some(pos) = order.iter().position(|&i| i == self.correct_index) {
            self.correct_index = pos;
        }
        self.options = shuffled;
    }
}

/// An ordered set of questions on one topic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quiz {
    /// Topic label
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Requested difficulty
    #[serde(default)]
    pub difficulty: Difficulty,

    /// Questions in presentation order
    pub questions: Vec<Question>,
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

impl Quiz {
    /// Create a medium-difficulty quiz
    pub fn new(topic: impl Into<String>, questions: Vec<Question>) -> Self {
        Self { topic: topic.into(), difficulty: Difficulty::default(), questions }
    }

    /// Number of questions
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the quiz has no questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the last question
    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    /// Check the shape the session controller relies on
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        for (index, question) in self.questions.iter().enumerate() {
            let count = question.options.len();
            if count < 2 {
                return Err(QuizError::TooFewOptions { question: index, count });
            }
            if question.correct_index >= count {
                return Err(QuizError::CorrectOutOfRange {
                    question: index,
                    correct: question.correct_index,
                    count,
                });
            }
        }

        Ok(())
    }

    /// Keep only the first `limit` questions
    pub fn truncate(&mut self, limit: usize) {
        self.questions.truncate(limit);
    }

    /// Shuffle the options of every question
    pub fn shuffle_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for question in &mut self.questions {
            question.shuffle_options(rng);
        }
    }

    /// Parse a quiz from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let quiz: Quiz = serde_json::from_str(json).context("Failed to parse quiz JSON")?;
        quiz.validate()?;
        Ok(quiz)
    }

    /// Load and validate a quiz file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read quiz from {:?}", path))?;
        Self::from_json(&contents).with_context(|| format!("Invalid quiz file {:?}", path))
    }
}
