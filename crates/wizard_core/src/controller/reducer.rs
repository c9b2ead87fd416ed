//! Wizard state and the transitions user actions and workflow events drive.
//!
//! The controller performs no I/O. User actions either fail locally or return
//! the [`WorkflowCommand`] to execute; the outcome comes back through
//! [`WizardController::apply`]. While a command is outstanding every user
//! action is rejected, so one stage can never have two calls in flight.

use shared::domain::{DocumentResult, Question, SessionId};
use tracing::{debug, info, warn};

use super::{
    events::{UiError, UiErrorContext, WorkflowCommand, WorkflowEvent},
    progress::Progress,
    state::{Catalogs, PendingOp, Selection, Stage},
    view::WizardView,
};

#[derive(Debug, Clone, Default)]
pub struct WizardController {
    stage: Stage,
    selection: Selection,
    catalogs: Catalogs,
    session: Option<SessionId>,
    questions: Vec<Question>,
    cursor: usize,
    draft: String,
    pending: Option<PendingOp>,
    error: Option<UiError>,
    document: Option<DocumentResult>,
}

impl WizardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.stage {
            Stage::Answering => self.questions.get(self.cursor),
            _ => None,
        }
    }

    /// In-progress answer for the current question, not yet stored.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.questions)
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&UiError> {
        self.error.as_ref()
    }

    pub fn document(&self) -> Option<&DocumentResult> {
        self.document.as_ref()
    }

    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.cursor + 1 == self.questions.len()
    }

    pub fn can_go_prev(&self) -> bool {
        self.stage == Stage::Answering && !self.is_busy() && self.cursor > 0
    }

    pub fn can_generate(&self) -> bool {
        self.stage == Stage::Generating && !self.is_busy() && self.document.is_none()
    }

    pub fn view(&self) -> WizardView<'_> {
        WizardView::of(self)
    }

    pub fn select_project(&mut self, project: impl Into<String>) -> Result<(), UiError> {
        self.guard(Stage::Selecting, UiErrorContext::Start)?;
        self.selection.project = project.into();
        Ok(())
    }

    pub fn select_template(&mut self, template: impl Into<String>) -> Result<(), UiError> {
        self.guard(Stage::Selecting, UiErrorContext::Start)?;
        self.selection.template = template.into();
        Ok(())
    }

    pub fn load_catalogs(&mut self) -> Result<WorkflowCommand, UiError> {
        self.guard(Stage::Selecting, UiErrorContext::Catalog)?;
        self.begin(PendingOp::LoadCatalogs);
        Ok(WorkflowCommand::LoadCatalogs)
    }

    /// Both selections must be present before anything is sent.
    pub fn start(&mut self) -> Result<WorkflowCommand, UiError> {
        self.guard(Stage::Selecting, UiErrorContext::Start)?;
        let (project, template) = match self.selection.validate() {
            Ok(ids) => ids,
            Err(err) => return Err(self.fail(err)),
        };

        self.session = None;
        self.questions.clear();
        self.begin(PendingOp::CreateSession);
        info!(%project, %template, "starting specification session");
        Ok(WorkflowCommand::CreateSession { project, template })
    }

    pub fn edit_answer(&mut self, raw: impl Into<String>) -> Result<(), UiError> {
        self.guard(Stage::Answering, UiErrorContext::Answer)?;
        self.draft = raw.into();
        Ok(())
    }

    /// Stores the draft, then advances; on the last question this returns
    /// the save command instead and the cursor stays put.
    pub fn go_next(&mut self) -> Result<Option<WorkflowCommand>, UiError> {
        self.guard(Stage::Answering, UiErrorContext::Answer)?;
        self.persist_draft()?;

        if !self.is_last_question() {
            self.move_cursor(self.cursor + 1);
            self.error = None;
            return Ok(None);
        }

        let Some(session) = self.session.clone() else {
            return Err(self.fail(UiError::validation(
                UiErrorContext::SaveAnswers,
                "No active session; start the wizard again.",
            )));
        };
        self.begin(PendingOp::SaveAnswers);
        debug!(%session, questions = self.questions.len(), "saving answers");
        Ok(Some(WorkflowCommand::SaveAnswers {
            session,
            questions: self.questions.clone(),
        }))
    }

    pub fn go_prev(&mut self) -> Result<(), UiError> {
        self.guard(Stage::Answering, UiErrorContext::Answer)?;
        self.persist_draft()?;
        if self.cursor > 0 {
            self.move_cursor(self.cursor - 1);
        }
        self.error = None;
        Ok(())
    }

    pub fn generate(&mut self) -> Result<WorkflowCommand, UiError> {
        self.guard(Stage::Generating, UiErrorContext::Generate)?;
        if self.document.is_some() {
            return Err(self.fail(UiError::validation(
                UiErrorContext::Generate,
                "The specification has already been generated.",
            )));
        }
        let Some(session) = self.session.clone() else {
            return Err(self.fail(UiError::validation(
                UiErrorContext::Generate,
                "No active session; start the wizard again.",
            )));
        };
        self.begin(PendingOp::GenerateDocument);
        info!(%session, "generating specification");
        Ok(WorkflowCommand::GenerateDocument { session })
    }

    /// Discards the run; the selection and catalogs are kept.
    pub fn reset(&mut self) -> Result<(), UiError> {
        if self.is_busy() {
            return Err(self.fail(UiError::busy(UiErrorContext::Start)));
        }
        *self = Self {
            selection: std::mem::take(&mut self.selection),
            catalogs: std::mem::take(&mut self.catalogs),
            ..Self::default()
        };
        debug!("wizard reset");
        Ok(())
    }

    /// Folds a settled command back into the state, returning a follow-up
    /// command when the workflow continues on its own.
    pub fn apply(&mut self, event: WorkflowEvent) -> Option<WorkflowCommand> {
        match (self.pending.take(), event) {
            (Some(PendingOp::LoadCatalogs), WorkflowEvent::CatalogsLoaded { projects, templates }) => {
                debug!(
                    projects = projects.len(),
                    templates = templates.len(),
                    "catalogs loaded"
                );
                self.catalogs = Catalogs {
                    projects,
                    templates,
                    loaded: true,
                };
                None
            }
            (Some(PendingOp::LoadCatalogs), WorkflowEvent::CatalogsFailed(err)) => {
                self.record_failure(UiErrorContext::Catalog, &err);
                None
            }
            (Some(PendingOp::CreateSession), WorkflowEvent::SessionCreated(session)) => {
                self.pending = Some(PendingOp::GenerateQuestions {
                    session: session.clone(),
                });
                Some(WorkflowCommand::GenerateQuestions { session })
            }
            (Some(PendingOp::CreateSession), WorkflowEvent::SessionFailed(err)) => {
                self.record_failure(UiErrorContext::Start, &err);
                None
            }
            (
                Some(PendingOp::GenerateQuestions { session }),
                WorkflowEvent::QuestionsGenerated(questions),
            ) => {
                info!(%session, questions = questions.len(), "question set received");
                self.session = Some(session);
                self.questions = questions;
                if self.questions.is_empty() {
                    self.stage = Stage::Generating;
                } else {
                    self.stage = Stage::Answering;
                    self.move_cursor(0);
                }
                None
            }
            (
                Some(PendingOp::GenerateQuestions { session }),
                WorkflowEvent::QuestionsFailed(err),
            ) => {
                debug!(%session, "discarding session after failed question generation");
                self.record_failure(UiErrorContext::Start, &err);
                None
            }
            (Some(PendingOp::SaveAnswers), WorkflowEvent::AnswersSaved) => {
                self.stage = Stage::Generating;
                None
            }
            (Some(PendingOp::SaveAnswers), WorkflowEvent::AnswersFailed(err)) => {
                self.record_failure(UiErrorContext::SaveAnswers, &err);
                None
            }
            (Some(PendingOp::GenerateDocument), WorkflowEvent::DocumentGenerated(document)) => {
                info!(
                    specification = %document.specification_id,
                    artifacts = document.artifacts.len(),
                    "specification ready"
                );
                self.document = Some(document);
                None
            }
            (Some(PendingOp::GenerateDocument), WorkflowEvent::DocumentFailed(err)) => {
                self.record_failure(UiErrorContext::Generate, &err);
                None
            }
            (pending, event) => {
                warn!(
                    event = event.name(),
                    pending = ?pending,
                    "ignoring workflow event that does not match the pending operation"
                );
                self.pending = pending;
                None
            }
        }
    }

    fn guard(&mut self, stage: Stage, context: UiErrorContext) -> Result<(), UiError> {
        if self.is_busy() {
            return Err(self.fail(UiError::busy(context)));
        }
        if self.stage != stage {
            return Err(self.fail(UiError::validation(
                context,
                format!("That action is not available while {:?}.", self.stage),
            )));
        }
        Ok(())
    }

    fn begin(&mut self, pending: PendingOp) {
        self.error = None;
        self.pending = Some(pending);
    }

    fn fail(&mut self, err: UiError) -> UiError {
        debug!(context = ?err.context(), message = err.message(), "wizard action rejected");
        self.error = Some(err.clone());
        err
    }

    fn record_failure(&mut self, context: UiErrorContext, err: &workflow_client::WorkflowError) {
        warn!(?context, error = %err, "workflow call failed");
        self.error = Some(UiError::from_workflow(context, err));
    }

    fn persist_draft(&mut self) -> Result<(), UiError> {
        let Some(question) = self.questions.get_mut(self.cursor) else {
            return Ok(());
        };
        if let Err(err) = question.set_answer(&self.draft) {
            return Err(self.fail(UiError::validation(UiErrorContext::Answer, err.to_string())));
        }
        Ok(())
    }

    fn move_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.draft = self
            .questions
            .get(cursor)
            .map(|question| question.answer().to_string())
            .unwrap_or_default();
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
