use shared::domain::{CatalogEntry, ProjectId, SessionId, TemplateId};

use super::events::{UiError, UiErrorContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Selecting,
    Answering,
    Generating,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub project: String,
    pub template: String,
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        !self.project.trim().is_empty() && !self.template.trim().is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(ProjectId, TemplateId), UiError> {
        let project = self.project.trim();
        let template = self.template.trim();
        let message = match (project.is_empty(), template.is_empty()) {
            (false, false) => {
                return Ok((ProjectId::new(project), TemplateId::new(template)));
            }
            (true, true) => "Select a project and a template first.",
            (true, false) => "Select a project first.",
            (false, true) => "Select a template first.",
        };
        Err(UiError::validation(UiErrorContext::Start, message))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogs {
    pub projects: Vec<CatalogEntry>,
    pub templates: Vec<CatalogEntry>,
    pub loaded: bool,
}

impl Catalogs {
    /// Hints shown instead of an empty picker.
    pub fn notices(&self) -> Vec<&'static str> {
        let mut notices = Vec::new();
        if !self.loaded {
            return notices;
        }
        if self.projects.is_empty() {
            notices.push("No projects found. Create one first.");
        }
        if self.templates.is_empty() {
            notices.push("No templates found. Create one first.");
        }
        notices
    }
}

/// Service call in flight. A session that exists only inside
/// `GenerateQuestions` is dropped if question generation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingOp {
    LoadCatalogs,
    CreateSession,
    GenerateQuestions { session: SessionId },
    SaveAnswers,
    GenerateDocument,
}
