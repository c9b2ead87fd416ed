//! Client side of the remote specification workflow API.
//!
//! The wizard only depends on the [`WorkflowService`] and [`CatalogService`]
//! traits; [`HttpWorkflowClient`] implements both against the whitelisted
//! method API.

use std::fmt;

use async_trait::async_trait;
use shared::{
    domain::{CatalogEntry, DocumentResult, ProjectId, Question, SessionId, TemplateId},
    error::{ApiError, ProtocolError},
};
use thiserror::Error;

mod http;

pub use http::{ClientOptions, HttpWorkflowClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListProjects,
    ListTemplates,
    CreateSession,
    GenerateQuestions,
    SaveAnswers,
    GenerateDocument,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListProjects => "list_projects",
            Operation::ListTemplates => "list_templates",
            Operation::CreateSession => "create_session",
            Operation::GenerateQuestions => "generate_questions",
            Operation::SaveAnswers => "save_answers",
            Operation::GenerateDocument => "generate_document",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
pub enum WorkflowError {
    #[error("{operation} could not reach the server: {message}")]
    Transport { operation: Operation, message: String },
    /// The request could not be built from the client options; nothing was sent.
    #[error("{operation} is misconfigured: {message}")]
    Configuration { operation: Operation, message: String },
    #[error("{operation} failed: {source}")]
    Api {
        operation: Operation,
        source: ApiError,
    },
    #[error("{operation} was rejected: {}", .message.as_deref().unwrap_or("no details"))]
    Rejected {
        operation: Operation,
        message: Option<String>,
    },
    #[error("{operation} returned an unusable reply: {source}")]
    Protocol {
        operation: Operation,
        source: ProtocolError,
    },
}

impl WorkflowError {
    pub fn rejected(operation: Operation, message: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            message: Some(message.into()),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            WorkflowError::Transport { operation, .. }
            | WorkflowError::Configuration { operation, .. }
            | WorkflowError::Api { operation, .. }
            | WorkflowError::Rejected { operation, .. }
            | WorkflowError::Protocol { operation, .. } => *operation,
        }
    }

    /// Message the server attached to the failure, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            WorkflowError::Rejected { message, .. } => message.as_deref(),
            WorkflowError::Api { source, .. } => source.message.as_deref(),
            WorkflowError::Transport { .. }
            | WorkflowError::Configuration { .. }
            | WorkflowError::Protocol { .. } => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, WorkflowError::Transport { .. })
    }
}

/// Remote operations the wizard sequences.
#[async_trait]
pub trait WorkflowService: Send + Sync {
    async fn create_session(
        &self,
        project: &ProjectId,
        template: &TemplateId,
    ) -> Result<SessionId, WorkflowError>;

    /// Questions come back in display order; an empty set is a valid reply.
    async fn generate_questions(&self, session: &SessionId)
        -> Result<Vec<Question>, WorkflowError>;

    async fn save_answers(
        &self,
        session: &SessionId,
        questions: &[Question],
    ) -> Result<(), WorkflowError>;

    async fn generate_document(&self, session: &SessionId)
        -> Result<DocumentResult, WorkflowError>;
}

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<CatalogEntry>, WorkflowError>;
    async fn list_templates(&self) -> Result<Vec<CatalogEntry>, WorkflowError>;
}
