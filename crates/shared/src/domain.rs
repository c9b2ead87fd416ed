use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AnswerError, ProtocolError};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(ProjectId);
id_newtype!(TemplateId);
id_newtype!(SessionId);
id_newtype!(SpecificationId);

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    Text,
    Select,
    Date,
    Number,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Text => "Text",
            QuestionKind::Select => "Select",
            QuestionKind::Date => "Date",
            QuestionKind::Number => "Number",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = ProtocolError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "Text" => Ok(QuestionKind::Text),
            "Select" => Ok(QuestionKind::Select),
            "Date" => Ok(QuestionKind::Date),
            "Number" => Ok(QuestionKind::Number),
            other => Err(ProtocolError::UnrecognizedQuestionKind(other.to_string())),
        }
    }
}

/// One prompt of the question set together with its stored answer.
///
/// Unanswered questions hold the empty string. Construct through
/// [`Question::new`], which enforces that `Select` questions carry options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    kind: QuestionKind,
    options: Vec<String>,
    answer: String,
}

impl Question {
    /// Select options are stored trimmed; blank ones are dropped.
    pub fn new(
        text: impl Into<String>,
        kind: QuestionKind,
        options: Vec<String>,
    ) -> Result<Self, ProtocolError> {
        let text = text.into();
        let options: Vec<String> = match kind {
            QuestionKind::Select => options
                .iter()
                .map(|option| option.trim())
                .filter(|option| !option.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        if kind == QuestionKind::Select && options.is_empty() {
            return Err(ProtocolError::SelectWithoutOptions(text));
        }
        Ok(Self {
            text,
            kind,
            options,
            answer: String::new(),
        })
    }

    pub fn free_text(prompt: impl Into<String>) -> Self {
        Self {
            text: prompt.into(),
            kind: QuestionKind::Text,
            options: Vec::new(),
            answer: String::new(),
        }
    }

    pub fn with_answer(mut self, raw: &str) -> Result<Self, AnswerError> {
        self.set_answer(raw)?;
        Ok(self)
    }

    pub fn prompt(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn is_answered(&self) -> bool {
        !self.answer.trim().is_empty()
    }

    /// Validates `raw` against this question's kind and returns the value
    /// that would be stored.
    pub fn normalize_answer(&self, raw: &str) -> Result<String, AnswerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        match self.kind {
            QuestionKind::Text => Ok(raw.to_string()),
            QuestionKind::Select => self
                .options
                .iter()
                .find(|option| option.as_str() == trimmed)
                .cloned()
                .ok_or_else(|| AnswerError::NotAnOption {
                    value: trimmed.to_string(),
                    options: self.options.clone(),
                }),
            QuestionKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(|date| date.format(DATE_FORMAT).to_string())
                .map_err(|_| AnswerError::InvalidDate(trimmed.to_string())),
            QuestionKind::Number => match trimmed.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(trimmed.to_string()),
                _ => Err(AnswerError::InvalidNumber(trimmed.to_string())),
            },
        }
    }

    pub fn set_answer(&mut self, raw: &str) -> Result<(), AnswerError> {
        self.answer = self.normalize_answer(raw)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, label: Option<String>) -> Self {
        let id = id.into();
        let label = label
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| id.clone());
        Self { id, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    Markdown,
    Pdf,
}

impl ArtifactFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactFormat::Markdown => "Markdown",
            ArtifactFormat::Pdf => "PDF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub format: ArtifactFormat,
    pub url: String,
}

/// Outcome of a successful document generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub specification_id: SpecificationId,
    pub record_url: String,
    pub artifacts: Vec<Artifact>,
    pub rendered_copy_available: bool,
}

impl DocumentResult {
    /// Non-empty when generation succeeded without every expected artifact.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.artifacts.is_empty() {
            warnings.push(
                "No downloadable files were produced; open the specification record instead."
                    .to_string(),
            );
        }
        let has_rendered = self
            .artifacts
            .iter()
            .any(|artifact| artifact.format == ArtifactFormat::Pdf);
        if !self.rendered_copy_available || !has_rendered {
            warnings.push("PDF copy was not produced for this specification.".to_string());
        }
        warnings
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings().is_empty()
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
