use crate::gateway::GatewayError;
use async_trait::async_trait;
use serde_json::Value;

pub mod http;

pub use http::HttpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    /// Local file uploaded under `field`. `param` names the tool parameter
    /// the path came from, for error reporting.
    File {
        field: &'static str,
        param: &'static str,
        path: String,
    },
    Text {
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// Transport-neutral description of one outbound call. Paths are kept as
/// segments so the transport can encode each one.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
    pub body: RequestBody,
}

impl BackendRequest {
    fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Get, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Post, segments)
    }

    pub fn query(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }

    pub fn query_opt(self, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn file(self, field: &'static str, param: &'static str, path: impl Into<String>) -> Self {
        self.part(FormPart::File {
            field,
            param,
            path: path.into(),
        })
    }

    pub fn files(self, field: &'static str, param: &'static str, paths: Vec<String>) -> Self {
        paths
            .into_iter()
            .fold(self, |request, path| request.file(field, param, path))
    }

    pub fn text(self, field: &'static str, value: impl Into<String>) -> Self {
        self.part(FormPart::Text {
            field,
            value: value.into(),
        })
    }

    fn part(mut self, part: FormPart) -> Self {
        match &mut self.body {
            RequestBody::Multipart(parts) => parts.push(part),
            _ => self.body = RequestBody::Multipart(vec![part]),
        }
        self
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and returns whatever response the backend produced.
/// Transport failures are reported as `BackendUnavailable`; status
/// interpretation is left to the gateway.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse, GatewayError>;
}
