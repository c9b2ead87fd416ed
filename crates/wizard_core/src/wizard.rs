use std::sync::Arc;

use shared::domain::DocumentResult;
use workflow_client::{CatalogService, WorkflowService};

use crate::controller::{
    events::{UiError, UiErrorContext, WorkflowCommand},
    orchestration::execute_command,
    reducer::WizardController,
    view::WizardView,
};

/// Async driver pairing a [`WizardController`] with the services it talks to.
///
/// Each async action returns once every call it triggered has settled; the
/// returned error is the one the controller surfaced for that action.
pub struct Wizard {
    controller: WizardController,
    workflow: Arc<dyn WorkflowService>,
    catalog: Arc<dyn CatalogService>,
}

impl Wizard {
    pub fn new(workflow: Arc<dyn WorkflowService>, catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            controller: WizardController::new(),
            workflow,
            catalog,
        }
    }

    pub fn with_client<C>(client: Arc<C>) -> Self
    where
        C: WorkflowService + CatalogService + 'static,
    {
        Self::new(client.clone(), client)
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn view(&self) -> WizardView<'_> {
        self.controller.view()
    }

    pub async fn load_catalogs(&mut self) -> Result<(), UiError> {
        let command = self.controller.load_catalogs()?;
        self.settle(command).await
    }

    pub fn select_project(&mut self, project: impl Into<String>) -> Result<(), UiError> {
        self.controller.select_project(project)
    }

    pub fn select_template(&mut self, template: impl Into<String>) -> Result<(), UiError> {
        self.controller.select_template(template)
    }

    pub async fn start(&mut self) -> Result<(), UiError> {
        let command = self.controller.start()?;
        self.settle(command).await
    }

    pub fn edit_answer(&mut self, raw: impl Into<String>) -> Result<(), UiError> {
        self.controller.edit_answer(raw)
    }

    pub async fn go_next(&mut self) -> Result<(), UiError> {
        match self.controller.go_next()? {
            Some(command) => self.settle(command).await,
            None => Ok(()),
        }
    }

    pub fn go_prev(&mut self) -> Result<(), UiError> {
        self.controller.go_prev()
    }

    pub async fn generate(&mut self) -> Result<&DocumentResult, UiError> {
        let command = self.controller.generate()?;
        self.settle(command).await?;
        self.controller.document().ok_or_else(|| {
            UiError::validation(
                UiErrorContext::Generate,
                "The server did not return a specification.",
            )
        })
    }

    pub fn reset(&mut self) -> Result<(), UiError> {
        self.controller.reset()
    }

    async fn settle(&mut self, command: WorkflowCommand) -> Result<(), UiError> {
        let mut next = Some(command);
        while let Some(command) = next.take() {
            let event =
                execute_command(self.workflow.as_ref(), self.catalog.as_ref(), command).await;
            next = self.controller.apply(event);
        }
        match self.controller.error() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
