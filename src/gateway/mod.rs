//! Remote entity gateway.
//!
//! A thin typed wrapper over the REST service: one method per
//! (resource, verb) pair, one request per call, no retries and no state.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::{
    CreateGroupRequest, CreateMemberRequest, CreateTaskRequest, Group, GroupId, Member, MemberId,
    OneOrMany, Task, TaskId, TaskStatus,
};

/// Typed client for the groups, members and tasks resources.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ==================== GROUPS ====================

    /// GET /groups/
    pub async fn list_groups(&self) -> Result<Vec<Group>, ClientError> {
        fetch(self.client.get(self.url("/groups/"))).await
    }

    /// POST /groups/
    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<Group, ClientError> {
        fetch(self.client.post(self.url("/groups/")).json(request)).await
    }

    /// GET /groups/{id}
    pub async fn get_group(&self, id: GroupId) -> Result<Group, ClientError> {
        fetch(self.client.get(self.url(&format!("/groups/{}", id)))).await
    }

    /// DELETE /groups/{id}
    pub async fn delete_group(&self, id: GroupId) -> Result<(), ClientError> {
        execute(self.client.delete(self.url(&format!("/groups/{}", id)))).await
    }

    // ==================== MEMBERS ====================

    /// GET /groups/{id}/members/
    pub async fn list_members(&self, group_id: GroupId) -> Result<Vec<Member>, ClientError> {
        fetch(
            self.client
                .get(self.url(&format!("/groups/{}/members/", group_id))),
        )
        .await
    }

    /// POST /groups/{id}/members/
    pub async fn add_member(
        &self,
        group_id: GroupId,
        request: &CreateMemberRequest,
    ) -> Result<Member, ClientError> {
        fetch(
            self.client
                .post(self.url(&format!("/groups/{}/members/", group_id)))
                .json(request),
        )
        .await
    }

    /// DELETE /members/{id}
    pub async fn remove_member(&self, id: MemberId) -> Result<(), ClientError> {
        execute(self.client.delete(self.url(&format!("/members/{}", id)))).await
    }

    // ==================== TASKS ====================

    /// GET /groups/{id}/tasks/, normalized to a sequence.
    pub async fn list_tasks(&self, group_id: GroupId) -> Result<Vec<Task>, ClientError> {
        let shape: OneOrMany<Task> = fetch(
            self.client
                .get(self.url(&format!("/groups/{}/tasks/", group_id))),
        )
        .await?;
        Ok(shape.into_vec())
    }

    /// POST /groups/{id}/tasks/, normalized to a sequence.
    ///
    /// A fan-out creation may yield any number of task records.
    pub async fn create_task(
        &self,
        group_id: GroupId,
        request: &CreateTaskRequest,
    ) -> Result<Vec<Task>, ClientError> {
        let shape: OneOrMany<Task> = fetch(
            self.client
                .post(self.url(&format!("/groups/{}/tasks/", group_id)))
                .json(request),
        )
        .await?;
        Ok(shape.into_vec())
    }

    /// PUT /tasks/{id}/status?status={value}
    pub async fn update_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, ClientError> {
        fetch(
            self.client
                .put(self.url(&format!("/tasks/{}/status", id)))
                .query(&[("status", status.as_str())]),
        )
        .await
    }

    /// DELETE /tasks/{id}
    pub async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        execute(self.client.delete(self.url(&format!("/tasks/{}", id)))).await
    }
}

/// Send a request and decode a JSON body.
async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = send(request).await?;
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Send a request whose success body is irrelevant.
async fn execute(request: RequestBuilder) -> Result<(), ClientError> {
    send(request).await.map(|_| ())
}

async fn send(request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    tracing::debug!(
        "{} {} -> {}",
        response.url().path(),
        response.url().query().unwrap_or_default(),
        status
    );

    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
