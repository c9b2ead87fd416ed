use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use shared::domain::{
    Artifact, ArtifactFormat, CatalogEntry, DocumentResult, ProjectId, Question, SessionId,
    SpecificationId, TemplateId,
};
use tokio::sync::Mutex;
use wizard_core::{Stage, UiErrorCategory, Wizard, WizardView};
use workflow_client::{CatalogService, Operation, WorkflowError, WorkflowService};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    ListProjects,
    ListTemplates,
    CreateSession(String, String),
    GenerateQuestions(String),
    SaveAnswers(String, Vec<(String, String)>),
    GenerateDocument(String),
}

/// Replays queued replies per operation and records every call it receives.
#[derive(Default)]
struct ScriptedService {
    calls: Mutex<Vec<Call>>,
    projects: Mutex<VecDeque<Result<Vec<CatalogEntry>, WorkflowError>>>,
    templates: Mutex<VecDeque<Result<Vec<CatalogEntry>, WorkflowError>>>,
    sessions: Mutex<VecDeque<Result<SessionId, WorkflowError>>>,
    questions: Mutex<VecDeque<Result<Vec<Question>, WorkflowError>>>,
    saves: Mutex<VecDeque<Result<(), WorkflowError>>>,
    documents: Mutex<VecDeque<Result<DocumentResult, WorkflowError>>>,
}

impl ScriptedService {
    async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }
}

async fn next_reply<T>(
    queue: &Mutex<VecDeque<Result<T, WorkflowError>>>,
    operation: Operation,
) -> Result<T, WorkflowError> {
    queue
        .lock()
        .await
        .pop_front()
        .unwrap_or_else(|| Err(WorkflowError::rejected(operation, "no scripted reply")))
}

#[async_trait]
impl WorkflowService for ScriptedService {
    async fn create_session(
        &self,
        project: &ProjectId,
        template: &TemplateId,
    ) -> Result<SessionId, WorkflowError> {
        self.record(Call::CreateSession(
            project.to_string(),
            template.to_string(),
        ))
        .await;
        next_reply(&self.sessions, Operation::CreateSession).await
    }

    async fn generate_questions(
        &self,
        session: &SessionId,
    ) -> Result<Vec<Question>, WorkflowError> {
        self.record(Call::GenerateQuestions(session.to_string())).await;
        next_reply(&self.questions, Operation::GenerateQuestions).await
    }

    async fn save_answers(
        &self,
        session: &SessionId,
        questions: &[Question],
    ) -> Result<(), WorkflowError> {
        let answers = questions
            .iter()
            .map(|question| (question.prompt().to_string(), question.answer().to_string()))
            .collect();
        self.record(Call::SaveAnswers(session.to_string(), answers))
            .await;
        next_reply(&self.saves, Operation::SaveAnswers).await
    }

    async fn generate_document(
        &self,
        session: &SessionId,
    ) -> Result<DocumentResult, WorkflowError> {
        self.record(Call::GenerateDocument(session.to_string())).await;
        next_reply(&self.documents, Operation::GenerateDocument).await
    }
}

#[async_trait]
impl CatalogService for ScriptedService {
    async fn list_projects(&self) -> Result<Vec<CatalogEntry>, WorkflowError> {
        self.record(Call::ListProjects).await;
        next_reply(&self.projects, Operation::ListProjects).await
    }

    async fn list_templates(&self) -> Result<Vec<CatalogEntry>, WorkflowError> {
        self.record(Call::ListTemplates).await;
        next_reply(&self.templates, Operation::ListTemplates).await
    }
}

fn markdown_only(spec: &str) -> DocumentResult {
    DocumentResult {
        specification_id: SpecificationId::new(spec),
        record_url: format!("http://erp.local/app/project-specification/{spec}"),
        artifacts: vec![Artifact {
            format: ArtifactFormat::Markdown,
            url: "http://erp.local/files/spec.md".to_string(),
        }],
        rendered_copy_available: false,
    }
}

#[tokio::test]
async fn single_question_run_reaches_generated_document() {
    let service = Arc::new(ScriptedService::default());
    service
        .sessions
        .lock()
        .await
        .push_back(Ok(SessionId::new("S1")));
    service
        .questions
        .lock()
        .await
        .push_back(Ok(vec![Question::free_text("Q1")]));
    service.saves.lock().await.push_back(Ok(()));
    service
        .documents
        .lock()
        .await
        .push_back(Ok(markdown_only("SPEC-0001")));

    let mut wizard = Wizard::with_client(service.clone());
    wizard.select_project("P1").expect("project");
    wizard.select_template("T1").expect("template");
    wizard.start().await.expect("start");
    assert_eq!(wizard.controller().stage(), Stage::Answering);

    wizard.edit_answer("42").expect("edit");
    wizard.go_next().await.expect("save");
    assert_eq!(wizard.controller().stage(), Stage::Generating);

    let document = wizard.generate().await.expect("generate");
    assert_eq!(document.specification_id.as_str(), "SPEC-0001");

    match wizard.view() {
        WizardView::Generate(view) => {
            assert_eq!(view.downloads.len(), 1);
            assert_eq!(view.downloads[0].url, "http://erp.local/files/spec.md");
            assert_eq!(
                view.record_link,
                Some("http://erp.local/app/project-specification/SPEC-0001")
            );
            assert!(!view.can_generate);
        }
        other => panic!("unexpected view: {other:?}"),
    }

    assert_eq!(
        service.calls().await,
        vec![
            Call::CreateSession("P1".into(), "T1".into()),
            Call::GenerateQuestions("S1".into()),
            Call::SaveAnswers("S1".into(), vec![("Q1".into(), "42".into())]),
            Call::GenerateDocument("S1".into()),
        ]
    );
}

#[tokio::test]
async fn empty_question_set_goes_straight_to_generation() {
    let service = Arc::new(ScriptedService::default());
    service
        .sessions
        .lock()
        .await
        .push_back(Ok(SessionId::new("S1")));
    service.questions.lock().await.push_back(Ok(Vec::new()));

    let mut wizard = Wizard::with_client(service.clone());
    wizard.select_project("P1").expect("project");
    wizard.select_template("T1").expect("template");
    wizard.start().await.expect("start");

    assert_eq!(wizard.controller().stage(), Stage::Generating);
    assert!(wizard.controller().can_generate());
    assert_eq!(wizard.controller().progress().percent(), 100);
}

#[tokio::test]
async fn failed_save_reports_server_message_and_can_be_retried() {
    let service = Arc::new(ScriptedService::default());
    service
        .sessions
        .lock()
        .await
        .push_back(Ok(SessionId::new("S1")));
    service.questions.lock().await.push_back(Ok(vec![
        Question::free_text("Q1"),
        Question::free_text("Q2"),
    ]));
    {
        let mut saves = service.saves.lock().await;
        saves.push_back(Err(WorkflowError::rejected(
            Operation::SaveAnswers,
            "network error",
        )));
        saves.push_back(Ok(()));
    }

    let mut wizard = Wizard::with_client(service.clone());
    wizard.select_project("P1").expect("project");
    wizard.select_template("T1").expect("template");
    wizard.start().await.expect("start");
    wizard.edit_answer("first").expect("edit");
    wizard.go_next().await.expect("advance");
    wizard.edit_answer("second").expect("edit");

    let err = wizard.go_next().await.expect_err("save fails");
    assert_eq!(err.message(), "network error");
    assert_eq!(err.category(), UiErrorCategory::Service);
    assert_eq!(wizard.controller().stage(), Stage::Answering);
    assert_eq!(wizard.controller().cursor(), 1);
    assert_eq!(wizard.controller().questions()[1].answer(), "second");

    wizard.go_next().await.expect("retry");
    assert_eq!(wizard.controller().stage(), Stage::Generating);
}

#[tokio::test]
async fn incomplete_selection_makes_no_calls() {
    let service = Arc::new(ScriptedService::default());
    let mut wizard = Wizard::with_client(service.clone());
    wizard.select_project("P1").expect("project");

    let err = wizard.start().await.expect_err("template missing");
    assert!(err.is_validation());
    assert_eq!(wizard.controller().stage(), Stage::Selecting);
    assert!(service.calls().await.is_empty());
}

#[tokio::test]
async fn question_generation_failure_returns_to_selection() {
    let service = Arc::new(ScriptedService::default());
    {
        let mut sessions = service.sessions.lock().await;
        sessions.push_back(Ok(SessionId::new("S1")));
        sessions.push_back(Ok(SessionId::new("S2")));
    }
    {
        let mut questions = service.questions.lock().await;
        questions.push_back(Err(WorkflowError::Transport {
            operation: Operation::GenerateQuestions,
            message: "connection reset".to_string(),
        }));
        questions.push_back(Ok(vec![Question::free_text("Q1")]));
    }

    let mut wizard = Wizard::with_client(service.clone());
    wizard.select_project("P1").expect("project");
    wizard.select_template("T1").expect("template");

    let err = wizard.start().await.expect_err("questions fail");
    assert_eq!(err.category(), UiErrorCategory::Transport);
    assert_eq!(wizard.controller().stage(), Stage::Selecting);
    assert!(wizard.controller().session().is_none());

    wizard.start().await.expect("retry");
    assert_eq!(wizard.controller().session(), Some(&SessionId::new("S2")));
}

#[tokio::test]
async fn empty_catalogs_produce_notices() {
    let service = Arc::new(ScriptedService::default());
    service.projects.lock().await.push_back(Ok(Vec::new()));
    service.templates.lock().await.push_back(Ok(Vec::new()));

    let mut wizard = Wizard::with_client(service.clone());
    wizard.load_catalogs().await.expect("catalogs");

    match wizard.view() {
        WizardView::Select(view) => {
            assert_eq!(
                view.notices,
                vec![
                    "No projects found. Create one first.",
                    "No templates found. Create one first."
                ]
            );
        }
        other => panic!("unexpected view: {other:?}"),
    }
    assert_eq!(
        service.calls().await,
        vec![Call::ListProjects, Call::ListTemplates]
    );
}

#[tokio::test]
async fn failed_catalog_load_can_be_retried() {
    let service = Arc::new(ScriptedService::default());
    {
        let mut projects = service.projects.lock().await;
        projects.push_back(Err(WorkflowError::Transport {
            operation: Operation::ListProjects,
            message: "connection refused".to_string(),
        }));
        projects.push_back(Ok(vec![CatalogEntry::new("P1", None)]));
    }
    service
        .templates
        .lock()
        .await
        .push_back(Ok(vec![CatalogEntry::new("T1", None)]));

    let mut wizard = Wizard::with_client(service.clone());
    let err = wizard.load_catalogs().await.expect_err("first load fails");
    assert_eq!(err.category(), UiErrorCategory::Transport);
    match wizard.view() {
        WizardView::Select(view) => assert!(!view.catalogs_loaded),
        other => panic!("unexpected view: {other:?}"),
    }

    wizard.load_catalogs().await.expect("retry");
    match wizard.view() {
        WizardView::Select(view) => {
            assert!(view.catalogs_loaded);
            assert_eq!(view.projects.len(), 1);
            assert_eq!(view.templates.len(), 1);
        }
        other => panic!("unexpected view: {other:?}"),
    }
    assert_eq!(
        service.calls().await,
        vec![Call::ListProjects, Call::ListProjects, Call::ListTemplates]
    );
}
