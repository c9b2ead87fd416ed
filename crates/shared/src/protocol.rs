use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{
        CatalogEntry, ProjectId, Question, QuestionKind, SessionId, SpecificationId, TemplateId,
    },
    error::ProtocolError,
};

pub const CREATE_SESSION_METHOD: &str = "create_session";
pub const GENERATE_QUESTIONS_METHOD: &str = "analyze_and_generate_questions";
pub const SAVE_ANSWERS_METHOD: &str = "save_answers";
pub const GENERATE_SPECIFICATION_METHOD: &str = "generate_specification";

/// Envelope the remote API wraps around every method return value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodResponse<T> {
    pub message: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplyStatus {
    /// `Err` carries the server's message, when it sent a non-blank one.
    pub fn into_result(self) -> Result<(), Option<String>> {
        if self.success {
            Ok(())
        } else {
            Err(self.error.filter(|message| !message.trim().is_empty()))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub project: ProjectId,
    pub template: TemplateId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    pub session_name: SessionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAnswersRequest {
    pub session_name: SessionId,
    pub answers: Vec<AnswerRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
}

impl From<&Question> for AnswerRecord {
    fn from(question: &Question) -> Self {
        Self {
            question: question.prompt().to_string(),
            answer: question.answer().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionReply {
    #[serde(flatten)]
    pub status: ReplyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_name: Option<SessionId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsReply {
    #[serde(flatten)]
    pub status: ReplyStatus,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckReply {
    #[serde(flatten)]
    pub status: ReplyStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecificationReply {
    #[serde(flatten)]
    pub status: ReplyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_name: Option<SpecificationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_generated: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "question_malay", alias = "question")]
    pub question: String,
    pub question_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_options: Option<SelectOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// Select options arrive either as a JSON array or as a JSON-encoded string
/// holding one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectOptions {
    List(Vec<String>),
    Encoded(String),
}

impl SelectOptions {
    pub fn decode(self) -> Result<Vec<String>, ProtocolError> {
        match self {
            SelectOptions::List(options) => Ok(options),
            SelectOptions::Encoded(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            SelectOptions::Encoded(raw) => serde_json::from_str::<Vec<String>>(&raw)
                .map_err(|err| ProtocolError::MalformedOptions(err.to_string())),
        }
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = ProtocolError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let kind = record.question_type.parse()?;
        let options = match (kind, record.select_options) {
            (QuestionKind::Select, Some(options)) => options.decode()?,
            _ => Vec::new(),
        };
        let question = Question::new(record.question, kind, options)?;
        match record.answer.as_deref() {
            Some(answer) if !answer.trim().is_empty() => question
                .with_answer(answer)
                .map_err(|err| ProtocolError::InvalidAnswer(err.to_string())),
            _ => Ok(question),
        }
    }
}

/// Listing returned by the generic resource endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub data: Vec<Value>,
}

impl ResourceList {
    /// Rows without a string `name` are skipped.
    pub fn into_entries(self, label_field: &str) -> Vec<CatalogEntry> {
        self.data
            .into_iter()
            .filter_map(|row| {
                let id = row.get("name")?.as_str()?.to_string();
                let label = row
                    .get(label_field)
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Some(CatalogEntry::new(id, label))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
