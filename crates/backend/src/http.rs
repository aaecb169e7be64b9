use api_types::RecordId;
use reqwest::{Client, Method, Url, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Backend, BackendError, DeleteParams, FetchParams, FetchResponse, RecordResponse, Result,
    WriteParams, WriteResponse,
};

const PROJECT_HEADER: &str = "x-project-id";

/// Client for the hosted record backend.
///
/// Every request carries the project id and the public key. Routes are
/// `{base_url}/projects/{project}/tables/{table}/...`.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    project_id: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, project_id: &str, public_key: &str) -> Result<Self> {
        Url::parse(base_url).map_err(|err| BackendError::InvalidBaseUrl(err.to_string()))?;
        if project_id.trim().is_empty() {
            return Err(BackendError::MissingSetting("project_id"));
        }
        if public_key.trim().is_empty() {
            return Err(BackendError::MissingSetting("public_key"));
        }

        let mut auth = header::HeaderValue::try_from(format!("Bearer {public_key}"))
            .map_err(|err| BackendError::InvalidCredentials(format!("public key: {err}")))?;
        auth.set_sensitive(true);

        let project = header::HeaderValue::try_from(project_id)
            .map_err(|err| BackendError::InvalidCredentials(format!("project id: {err}")))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(PROJECT_HEADER, project);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            project_id: project_id.to_string(),
        })
    }

    pub fn builder() -> HttpBackendBuilder {
        HttpBackendBuilder::default()
    }

    fn url(&self, table: &str, path: &str) -> String {
        format!(
            "{}/projects/{}/tables/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            table,
            path.trim_start_matches('/')
        )
    }

    async fn send<TReq, TResp>(&self, method: Method, url: String, body: &TReq) -> Result<TResp>
    where
        TReq: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        tracing::debug!(%method, %url, "backend request");
        let resp = self.client.request(method, url).json(body).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<TResp>().await?);
        }

        let message = match resp.json::<Value>().await {
            Ok(body) => body
                .get("message")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("server error")
                .to_string(),
            Err(_) => "server error".to_string(),
        };
        Err(BackendError::Server { status, message })
    }
}

impl Backend for HttpBackend {
    async fn fetch_records(&self, table: &str, params: &FetchParams) -> Result<FetchResponse> {
        self.send(Method::POST, self.url(table, "records/query"), params)
            .await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> Result<RecordResponse> {
        self.send(
            Method::POST,
            self.url(table, &format!("records/{id}/query")),
            params,
        )
        .await
    }

    async fn create_records(&self, table: &str, params: &WriteParams) -> Result<WriteResponse> {
        self.send(Method::POST, self.url(table, "records"), params)
            .await
    }

    async fn update_records(&self, table: &str, params: &WriteParams) -> Result<WriteResponse> {
        self.send(Method::PATCH, self.url(table, "records"), params)
            .await
    }

    async fn delete_records(&self, table: &str, params: &DeleteParams) -> Result<WriteResponse> {
        self.send(Method::DELETE, self.url(table, "records"), params)
            .await
    }
}

#[derive(Default, Debug)]
pub struct HttpBackendBuilder {
    base_url: String,
    project_id: String,
    public_key: String,
}

impl HttpBackendBuilder {
    pub fn base_url(mut self, base_url: &str) -> HttpBackendBuilder {
        self.base_url = base_url.to_string();
        self
    }

    pub fn project(mut self, project_id: &str, public_key: &str) -> HttpBackendBuilder {
        self.project_id = project_id.to_string();
        self.public_key = public_key.to_string();
        self
    }

    pub fn build(self) -> Result<HttpBackend> {
        tracing::info!("Initializing hosted backend client...");
        HttpBackend::new(&self.base_url, &self.project_id, &self.public_key)
    }
}
