//! Specification wizard: a three-stage controller (select, answer, generate)
//! over the remote workflow services.

pub mod controller;
mod wizard;

pub use controller::{
    events::{UiError, UiErrorCategory, UiErrorContext, WorkflowCommand, WorkflowEvent},
    progress::Progress,
    reducer::WizardController,
    state::{Catalogs, Selection, Stage},
    view::{AnswerView, DownloadLink, GenerateView, SelectView, WizardView},
};
pub use wizard::Wizard;
