//! Read-only projection of the controller for a front-end to render.

use shared::domain::{CatalogEntry, DocumentResult, Question};

use super::{
    progress::Progress,
    reducer::WizardController,
    state::{Selection, Stage},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardView<'a> {
    Select(SelectView<'a>),
    Answer(AnswerView<'a>),
    Generate(GenerateView<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectView<'a> {
    pub selection: &'a Selection,
    pub projects: &'a [CatalogEntry],
    pub templates: &'a [CatalogEntry],
    /// False until a catalog load has succeeded.
    pub catalogs_loaded: bool,
    pub notices: Vec<&'static str>,
    pub busy: bool,
    pub can_start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView<'a> {
    pub question: &'a Question,
    /// 1-based.
    pub position: usize,
    pub total: usize,
    pub draft: &'a str,
    pub progress: Progress,
    pub can_go_prev: bool,
    pub is_last: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateView<'a> {
    pub busy: bool,
    pub can_generate: bool,
    pub progress: Progress,
    pub document: Option<&'a DocumentResult>,
    pub downloads: Vec<DownloadLink<'a>>,
    pub record_link: Option<&'a str>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadLink<'a> {
    pub label: &'static str,
    pub url: &'a str,
}

impl<'a> WizardView<'a> {
    pub(crate) fn of(controller: &'a WizardController) -> Self {
        let busy = controller.is_busy();
        match (controller.stage(), controller.current_question()) {
            (Stage::Selecting, _) => WizardView::Select(SelectView {
                selection: controller.selection(),
                projects: &controller.catalogs().projects,
                templates: &controller.catalogs().templates,
                catalogs_loaded: controller.catalogs().loaded,
                notices: controller.catalogs().notices(),
                busy,
                can_start: !busy && controller.selection().is_complete(),
            }),
            (Stage::Answering, Some(question)) => WizardView::Answer(AnswerView {
                question,
                position: controller.cursor() + 1,
                total: controller.questions().len(),
                draft: controller.draft(),
                progress: controller.progress(),
                can_go_prev: controller.can_go_prev(),
                is_last: controller.is_last_question(),
                busy,
            }),
            _ => {
                let document = controller.document();
                WizardView::Generate(GenerateView {
                    busy,
                    can_generate: controller.can_generate(),
                    progress: controller.progress(),
                    document,
                    downloads: document
                        .map(|document| {
                            document
                                .artifacts
                                .iter()
                                .map(|artifact| DownloadLink {
                                    label: artifact.format.label(),
                                    url: artifact.url.as_str(),
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                    record_link: document.map(|document| document.record_url.as_str()),
                    warnings: document.map(DocumentResult::warnings).unwrap_or_default(),
                })
            }
        }
    }
}
