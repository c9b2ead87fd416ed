//! Workflow commands, the events they settle into, and error modeling for the wizard.

use shared::domain::{CatalogEntry, DocumentResult, ProjectId, Question, SessionId, TemplateId};
use thiserror::Error;
use workflow_client::WorkflowError;

/// Service call the controller wants executed next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowCommand {
    LoadCatalogs,
    CreateSession {
        project: ProjectId,
        template: TemplateId,
    },
    GenerateQuestions {
        session: SessionId,
    },
    SaveAnswers {
        session: SessionId,
        questions: Vec<Question>,
    },
    GenerateDocument {
        session: SessionId,
    },
}

impl WorkflowCommand {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowCommand::LoadCatalogs => "load_catalogs",
            WorkflowCommand::CreateSession { .. } => "create_session",
            WorkflowCommand::GenerateQuestions { .. } => "generate_questions",
            WorkflowCommand::SaveAnswers { .. } => "save_answers",
            WorkflowCommand::GenerateDocument { .. } => "generate_document",
        }
    }
}

/// Settlement of a [`WorkflowCommand`].
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    CatalogsLoaded {
        projects: Vec<CatalogEntry>,
        templates: Vec<CatalogEntry>,
    },
    CatalogsFailed(WorkflowError),
    SessionCreated(SessionId),
    SessionFailed(WorkflowError),
    QuestionsGenerated(Vec<Question>),
    QuestionsFailed(WorkflowError),
    AnswersSaved,
    AnswersFailed(WorkflowError),
    DocumentGenerated(DocumentResult),
    DocumentFailed(WorkflowError),
}

impl WorkflowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::CatalogsLoaded { .. } => "catalogs_loaded",
            WorkflowEvent::CatalogsFailed(_) => "catalogs_failed",
            WorkflowEvent::SessionCreated(_) => "session_created",
            WorkflowEvent::SessionFailed(_) => "session_failed",
            WorkflowEvent::QuestionsGenerated(_) => "questions_generated",
            WorkflowEvent::QuestionsFailed(_) => "questions_failed",
            WorkflowEvent::AnswersSaved => "answers_saved",
            WorkflowEvent::AnswersFailed(_) => "answers_failed",
            WorkflowEvent::DocumentGenerated(_) => "document_generated",
            WorkflowEvent::DocumentFailed(_) => "document_failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    /// Rejected locally; no service call was made.
    Validation,
    Service,
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Catalog,
    Start,
    Answer,
    SaveAnswers,
    Generate,
}

impl UiErrorContext {
    fn fallback_message(&self) -> &'static str {
        match self {
            UiErrorContext::Catalog => "Could not load projects and templates; please retry.",
            UiErrorContext::Start => "Could not start the specification session; please retry.",
            UiErrorContext::Answer => "Could not record the answer.",
            UiErrorContext::SaveAnswers => "Could not save your answers; please retry.",
            UiErrorContext::Generate => "Could not generate the specification; please retry.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn validation(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Validation,
            context,
            message: message.into(),
        }
    }

    pub fn busy(context: UiErrorContext) -> Self {
        Self::validation(
            context,
            "Still waiting for the server; try again once it responds.",
        )
    }

    /// The server's own message wins; otherwise a per-context fallback.
    pub fn from_workflow(context: UiErrorContext, err: &WorkflowError) -> Self {
        let (category, message) = match (err, err.server_message()) {
            (_, Some(message)) => (UiErrorCategory::Service, message.to_string()),
            (WorkflowError::Transport { .. }, None) => (
                UiErrorCategory::Transport,
                "Server unreachable; check the server URL/network and retry.".to_string(),
            ),
            (WorkflowError::Configuration { message, .. }, None) => (
                UiErrorCategory::Validation,
                format!("Client configuration error: {message}"),
            ),
            (WorkflowError::Protocol { source, .. }, None) => (
                UiErrorCategory::Service,
                format!("{} ({source})", context.fallback_message()),
            ),
            _ => (
                UiErrorCategory::Service,
                context.fallback_message().to_string(),
            ),
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_validation(&self) -> bool {
        self.category == UiErrorCategory::Validation
    }
}
