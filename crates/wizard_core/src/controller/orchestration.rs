//! Command orchestration from controller commands to the workflow services.

use tracing::debug;
use workflow_client::{CatalogService, WorkflowError, WorkflowService};

use super::events::{WorkflowCommand, WorkflowEvent};

/// Runs one command to settlement. Failures come back as events, never as
/// errors, so the controller decides what they mean for its state.
pub async fn execute_command(
    workflow: &dyn WorkflowService,
    catalog: &dyn CatalogService,
    command: WorkflowCommand,
) -> WorkflowEvent {
    let command_name = command.name();
    debug!(command = command_name, "executing workflow command");

    let event = match command {
        WorkflowCommand::LoadCatalogs => {
            let loaded = async {
                let projects = catalog.list_projects().await?;
                let templates = catalog.list_templates().await?;
                Ok::<_, WorkflowError>((projects, templates))
            };
            match loaded.await {
                Ok((projects, templates)) => WorkflowEvent::CatalogsLoaded {
                    projects,
                    templates,
                },
                Err(err) => WorkflowEvent::CatalogsFailed(err),
            }
        }
        WorkflowCommand::CreateSession { project, template } => {
            match workflow.create_session(&project, &template).await {
                Ok(session) => WorkflowEvent::SessionCreated(session),
                Err(err) => WorkflowEvent::SessionFailed(err),
            }
        }
        WorkflowCommand::GenerateQuestions { session } => {
            match workflow.generate_questions(&session).await {
                Ok(questions) => WorkflowEvent::QuestionsGenerated(questions),
                Err(err) => WorkflowEvent::QuestionsFailed(err),
            }
        }
        WorkflowCommand::SaveAnswers { session, questions } => {
            match workflow.save_answers(&session, &questions).await {
                Ok(()) => WorkflowEvent::AnswersSaved,
                Err(err) => WorkflowEvent::AnswersFailed(err),
            }
        }
        WorkflowCommand::GenerateDocument { session } => {
            match workflow.generate_document(&session).await {
                Ok(document) => WorkflowEvent::DocumentGenerated(document),
                Err(err) => WorkflowEvent::DocumentFailed(err),
            }
        }
    };

    debug!(command = command_name, event = event.name(), "workflow command settled");
    event
}
