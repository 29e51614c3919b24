use crate::backend::{BackendRequest, BackendResponse, FormPart, Method, RequestBody, Transport};
use crate::config::GatewayConfig;
use crate::gateway::GatewayError;
use crate::mcp::contracts::{API_KEY_HEADER, PROJECT_ID_HEADER};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use std::error::Error as _;
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// reqwest-backed transport. Holds the only copy of the credentials.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    api_key: String,
    project_id: Option<String>,
    timeout: Duration,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: &GatewayConfig, http: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            project_id: config.project_id.clone(),
            timeout: config.timeout,
            http,
        }
    }

    fn url(&self, request: &BackendRequest) -> Result<Url, GatewayError> {
        // `PathSegmentsMut::extend` resolves these instead of encoding them.
        if let Some(segment) = request
            .segments
            .iter()
            .find(|segment| matches!(segment.trim(), "." | ".."))
        {
            return Err(GatewayError::invalid(
                "path",
                format!("`{segment}` is not a valid path segment"),
            ));
        }
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                GatewayError::BackendUnavailable(format!(
                    "base url cannot carry a path: {}",
                    self.base_url
                ))
            })?;
            segments.pop_if_empty().extend(&request.segments);
        }
        Ok(url)
    }

    async fn prepare(&self, request: &BackendRequest) -> Result<reqwest::RequestBuilder, GatewayError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = self
            .http
            .request(method, self.url(request)?)
            .header(API_KEY_HEADER, &self.api_key);
        if let Some(project_id) = &self.project_id {
            builder = builder.header(PROJECT_ID_HEADER, project_id);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts).await?),
        };
        Ok(builder)
    }

    fn unavailable(&self, request: &BackendRequest, err: reqwest::Error) -> GatewayError {
        let reason = if err.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs_f64())
        } else {
            describe(&err)
        };
        GatewayError::BackendUnavailable(format!(
            "{} {}: {reason}",
            request.method.as_str(),
            request.path()
        ))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse, GatewayError> {
        let builder = self.prepare(&request).await?;
        debug!(method = request.method.as_str(), path = %request.path(), "sending backend request");

        let response = builder.send().await.map_err(|err| {
            let err = self.unavailable(&request, err);
            warn!("{err}");
            err
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| self.unavailable(&request, err))?;

        debug!(status, bytes = body.len(), "backend responded");
        Ok(BackendResponse { status, body })
    }
}

/// Reads every file part up front so a missing input fails before anything
/// is sent.
async fn build_form(parts: &[FormPart]) -> Result<Form, GatewayError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::File { field, param, path } => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|err| read_error(param, path, err))?;
                let file_name = Path::new(path)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.clone());
                form.part(*field, Part::bytes(bytes).file_name(file_name))
            }
            FormPart::Text { field, value } => form.text(*field, value.clone()),
        };
    }
    Ok(form)
}

fn read_error(param: &str, path: &str, err: io::Error) -> GatewayError {
    let message = match err.kind() {
        io::ErrorKind::NotFound => format!("file not found: {path}"),
        _ => format!("failed to read {path}: {err}"),
    };
    GatewayError::invalid(param, message)
}

fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
