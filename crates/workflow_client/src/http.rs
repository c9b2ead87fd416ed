use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    domain::{
        Artifact, ArtifactFormat, CatalogEntry, DocumentResult, ProjectId, Question, SessionId,
        TemplateId,
    },
    error::{ApiError, ProtocolError},
    protocol::{
        AckReply, AnswerRecord, CreateSessionReply, CreateSessionRequest, MethodResponse,
        QuestionsReply, ResourceList, SaveAnswersRequest, SessionRequest, SpecificationReply,
        CREATE_SESSION_METHOD, GENERATE_QUESTIONS_METHOD, GENERATE_SPECIFICATION_METHOD,
        SAVE_ANSWERS_METHOD,
    },
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{CatalogService, Operation, WorkflowError, WorkflowService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub server_url: String,
    pub method_prefix: String,
    pub auth_token: Option<String>,
    pub request_timeout: Option<Duration>,
    pub project_doctype: String,
    pub project_label_field: String,
    pub template_doctype: String,
    pub template_label_field: String,
    pub record_route: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            method_prefix: "pro_tender.api".into(),
            auth_token: None,
            request_timeout: None,
            project_doctype: "Projects".into(),
            project_label_field: "project_name".into(),
            template_doctype: "Project Template".into(),
            template_label_field: "template_name".into(),
            record_route: "app/project-specification".into(),
        }
    }
}

pub struct HttpWorkflowClient {
    http: Client,
    base: Url,
    options: ClientOptions,
}

impl HttpWorkflowClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let mut base = Url::parse(options.server_url.trim())
            .with_context(|| format!("invalid server url '{}'", options.server_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;

        Ok(Self {
            http,
            base,
            options,
        })
    }

    pub fn server_url(&self) -> &Url {
        &self.base
    }

    fn method_url(&self, method: &str) -> Result<Url, url::ParseError> {
        self.base.join(&format!(
            "api/method/{}.{method}",
            self.options.method_prefix.trim_end_matches('.')
        ))
    }

    fn resource_url(&self, doctype: &str, label_field: &str) -> Result<Url, url::ParseError> {
        let mut url = self.base.join("api/resource")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(doctype);
        let fields = serde_json::json!(["name", label_field]).to_string();
        url.query_pairs_mut()
            .append_pair("fields", &fields)
            .append_pair("limit_page_length", "0");
        Ok(url)
    }

    fn record_url(&self, spec_name: &str) -> Result<Url, url::ParseError> {
        let mut url = self
            .base
            .join(&format!("{}/", self.options.record_route.trim_matches('/')))?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(spec_name);
        Ok(url)
    }

    fn resolve_link(&self, operation: Operation, raw: &str) -> Result<String, WorkflowError> {
        self.base
            .join(raw.trim())
            .map(String::from)
            .map_err(|_| protocol(operation, ProtocolError::InvalidLink(raw.to_string())))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.options.auth_token {
            Some(token) if !token.trim().is_empty() => {
                request.header(AUTHORIZATION, format!("token {}", token.trim()))
            }
            _ => request,
        }
    }

    async fn call_method<B, R>(
        &self,
        operation: Operation,
        method: &str,
        body: &B,
    ) -> Result<R, WorkflowError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.method_url(method).map_err(|err| WorkflowError::Configuration {
            operation,
            message: format!("invalid method url: {err}"),
        })?;
        debug!(%operation, %url, "calling workflow method");
        let request = self.authorize(self.http.post(url).json(body));
        let envelope: MethodResponse<R> = self.send(operation, request).await?;
        Ok(envelope.message)
    }

    async fn send<R: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<R, WorkflowError> {
        let response = request.send().await.map_err(|err| transport(operation, err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport(operation, err))?;

        if !status.is_success() {
            let message = extract_server_message(&body);
            warn!(%operation, status = status.as_u16(), ?message, "workflow request failed");
            return Err(WorkflowError::Api {
                operation,
                source: ApiError::new(status.as_u16(), message),
            });
        }

        serde_json::from_slice(&body)
            .map_err(|err| protocol(operation, ProtocolError::Undecodable(err.to_string())))
    }

    async fn list_catalog(
        &self,
        operation: Operation,
        doctype: &str,
        label_field: &str,
    ) -> Result<Vec<CatalogEntry>, WorkflowError> {
        let url = self
            .resource_url(doctype, label_field)
            .map_err(|err| WorkflowError::Configuration {
                operation,
                message: format!("invalid resource url: {err}"),
            })?;
        debug!(%operation, %url, "listing catalog");
        let list: ResourceList = self.send(operation, self.authorize(self.http.get(url))).await?;
        let entries = list.into_entries(label_field);
        debug!(%operation, count = entries.len(), "catalog listed");
        Ok(entries)
    }
}

#[async_trait]
impl WorkflowService for HttpWorkflowClient {
    async fn create_session(
        &self,
        project: &ProjectId,
        template: &TemplateId,
    ) -> Result<SessionId, WorkflowError> {
        let operation = Operation::CreateSession;
        let request = CreateSessionRequest {
            project: project.clone(),
            template: template.clone(),
        };
        let reply: CreateSessionReply = self
            .call_method(operation, CREATE_SESSION_METHOD, &request)
            .await?;
        reply
            .status
            .into_result()
            .map_err(|message| WorkflowError::Rejected { operation, message })?;
        let session = reply
            .session_name
            .filter(|session| !session.as_str().trim().is_empty())
            .ok_or_else(|| protocol(operation, ProtocolError::MissingField("session_name")))?;
        info!(%session, %project, %template, "specification session created");
        Ok(session)
    }

    async fn generate_questions(
        &self,
        session: &SessionId,
    ) -> Result<Vec<Question>, WorkflowError> {
        let operation = Operation::GenerateQuestions;
        let request = SessionRequest {
            session_name: session.clone(),
        };
        let reply: QuestionsReply = self
            .call_method(operation, GENERATE_QUESTIONS_METHOD, &request)
            .await?;
        reply
            .status
            .into_result()
            .map_err(|message| WorkflowError::Rejected { operation, message })?;
        let questions = reply
            .questions
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| protocol(operation, err))?;
        info!(%session, questions = questions.len(), "questions generated");
        Ok(questions)
    }

    async fn save_answers(
        &self,
        session: &SessionId,
        questions: &[Question],
    ) -> Result<(), WorkflowError> {
        let operation = Operation::SaveAnswers;
        let request = SaveAnswersRequest {
            session_name: session.clone(),
            answers: questions.iter().map(AnswerRecord::from).collect(),
        };
        let reply: AckReply = self
            .call_method(operation, SAVE_ANSWERS_METHOD, &request)
            .await?;
        reply
            .status
            .into_result()
            .map_err(|message| WorkflowError::Rejected { operation, message })?;
        info!(%session, answers = request.answers.len(), "answers saved");
        Ok(())
    }

    async fn generate_document(
        &self,
        session: &SessionId,
    ) -> Result<DocumentResult, WorkflowError> {
        let operation = Operation::GenerateDocument;
        let request = SessionRequest {
            session_name: session.clone(),
        };
        let reply: SpecificationReply = self
            .call_method(operation, GENERATE_SPECIFICATION_METHOD, &request)
            .await?;
        reply
            .status
            .into_result()
            .map_err(|message| WorkflowError::Rejected { operation, message })?;

        let specification_id = reply
            .spec_name
            .filter(|name| !name.as_str().trim().is_empty())
            .ok_or_else(|| protocol(operation, ProtocolError::MissingField("spec_name")))?;
        let record_url = self
            .record_url(specification_id.as_str())
            .map(String::from)
            .map_err(|_| {
                protocol(
                    operation,
                    ProtocolError::InvalidLink(specification_id.to_string()),
                )
            })?;

        let mut artifacts = Vec::new();
        for (format, link) in [
            (ArtifactFormat::Markdown, reply.file_url.as_deref()),
            (ArtifactFormat::Pdf, reply.pdf_url.as_deref()),
        ] {
            if let Some(link) = link.filter(|link| !link.trim().is_empty()) {
                artifacts.push(Artifact {
                    format,
                    url: self.resolve_link(operation, link)?,
                });
            }
        }
        let has_pdf = artifacts
            .iter()
            .any(|artifact| artifact.format == ArtifactFormat::Pdf);
        let result = DocumentResult {
            specification_id,
            record_url,
            artifacts,
            rendered_copy_available: reply.pdf_generated.unwrap_or(has_pdf),
        };

        if result.is_degraded() {
            warn!(
                %session,
                specification = %result.specification_id,
                artifacts = result.artifacts.len(),
                "specification generated with missing artifacts"
            );
        } else {
            info!(
                %session,
                specification = %result.specification_id,
                "specification generated"
            );
        }
        Ok(result)
    }
}

#[async_trait]
impl CatalogService for HttpWorkflowClient {
    async fn list_projects(&self) -> Result<Vec<CatalogEntry>, WorkflowError> {
        self.list_catalog(
            Operation::ListProjects,
            &self.options.project_doctype,
            &self.options.project_label_field,
        )
        .await
    }

    async fn list_templates(&self) -> Result<Vec<CatalogEntry>, WorkflowError> {
        self.list_catalog(
            Operation::ListTemplates,
            &self.options.template_doctype,
            &self.options.template_label_field,
        )
        .await
    }
}

fn transport(operation: Operation, err: reqwest::Error) -> WorkflowError {
    WorkflowError::Transport {
        operation,
        message: err.to_string(),
    }
}

fn protocol(operation: Operation, source: ProtocolError) -> WorkflowError {
    WorkflowError::Protocol { operation, source }
}

/// Picks the most readable message out of an error body.
///
/// `_server_messages` is a JSON-encoded list of JSON-encoded objects.
fn extract_server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    let from_server_messages = value
        .get("_server_messages")
        .and_then(Value::as_str)
        .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
        .and_then(|messages| {
            messages.into_iter().find_map(|encoded| {
                serde_json::from_str::<Value>(&encoded)
                    .ok()
                    .and_then(|inner| inner.get("message").and_then(Value::as_str).map(str::to_string))
            })
        });

    from_server_messages
        .or_else(|| value.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| value.get("exception").and_then(Value::as_str).map(str::to_string))
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
