use crate::config::ClientConfig;
use crate::errors::ClientError;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

pub const CREATE_FAILED: &str = "Failed to create todo";
pub const FETCH_FAILED: &str = "Failed to fetch todos";
pub const UPDATE_FAILED: &str = "Failed to update todo";
pub const DELETE_FAILED: &str = "Failed to delete todo";

/// 画面で扱う ToDo（タイムスタンプは持たない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoSummary {
    pub todo_id: String,
    pub title: String,
    pub completed: bool,
}

/// ToDo API のデータ層
///
/// 各メソッドは 1 回の HTTP 呼び出しに対応し、`token` をそのまま
/// `Authorization` ヘッダーに載せる。
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn create_todo(&self, title: &str, token: &str) -> Result<TodoSummary, ClientError>;

    async fn list_todos(&self, token: &str) -> Result<Vec<TodoSummary>, ClientError>;

    async fn update_todo(
        &self,
        todo_id: &str,
        title: &str,
        completed: bool,
        token: &str,
    ) -> Result<(), ClientError>;

    async fn delete_todo(&self, todo_id: &str, token: &str) -> Result<(), ClientError>;
}

/// `reqwest` による実装
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    base_url: Url,
}

impl HttpTodoApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid API_INVOKE_URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "API_INVOKE_URL cannot be a base URL: {base_url}"
            )));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.api_invoke_url)
    }

    /// `{base}/todos[/{id}]`。ID はパスセグメントとしてエンコードする
    pub fn todos_url(&self, todo_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("todos");
            if let Some(id) = todo_id {
                segments.push(id);
            }
        }
        url
    }

    fn request(&self, method: Method, todo_id: Option<&str>, token: &str) -> RequestBuilder {
        self.client
            .request(method, self.todos_url(todo_id))
            .header(reqwest::header::AUTHORIZATION, token)
    }

    /// 送信し、2xx 以外は固定文言の `RequestFailed` にする
    async fn send(
        &self,
        request: RequestBuilder,
        failure: &'static str,
    ) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "{failure}");
            ClientError::Transport(e.to_string())
        })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "{failure}");
            return Err(ClientError::RequestFailed(failure.to_string()));
        }
        Ok(response)
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn create_todo(&self, title: &str, token: &str) -> Result<TodoSummary, ClientError> {
        let request = self
            .request(Method::POST, None, token)
            .json(&json!({ "title": title }));

        self.send(request, CREATE_FAILED)
            .await?
            .json::<TodoSummary>()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }

    async fn list_todos(&self, token: &str) -> Result<Vec<TodoSummary>, ClientError> {
        let request = self.request(Method::GET, None, token);

        self.send(request, FETCH_FAILED)
            .await?
            .json::<Vec<TodoSummary>>()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }

    async fn update_todo(
        &self,
        todo_id: &str,
        title: &str,
        completed: bool,
        token: &str,
    ) -> Result<(), ClientError> {
        let request = self
            .request(Method::PUT, Some(todo_id), token)
            .json(&json!({ "title": title, "completed": completed }));

        self.send(request, UPDATE_FAILED).await?;
        Ok(())
    }

    async fn delete_todo(&self, todo_id: &str, token: &str) -> Result<(), ClientError> {
        let request = self
            .request(Method::DELETE, Some(todo_id), token)
            .json(&json!({ "todoId": todo_id }));

        self.send(request, DELETE_FAILED).await?;
        Ok(())
    }
}
