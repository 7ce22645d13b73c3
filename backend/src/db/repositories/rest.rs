//! Repository backed by the task backend's REST API.
//!
//! Every request carries the configured API token in the `Authorization`
//! header. List endpoints may answer with a bare array or with a paginated
//! `{ "results": [...], "next": ... }` envelope; both are accepted and
//! pagination is followed to the end.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

use crate::db::config::RestConfig;
use crate::db::repository::*;
use crate::models::{
    CleaningTaskRecord, DateRange, EventKey, EventKind, EventStatus,
    ProductionLineRecord, ProductionTaskRecord, ResourceId, ScheduleChange, UserRecord,
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Plain(Vec<T>),
    Paged {
        results: Vec<T>,
        #[serde(default)]
        next: Option<String>,
    },
}

/// REST repository talking to the task backend.
pub struct RestRepository {
    client: Client,
    config: RestConfig,
    base_url: String,
}

impl RestRepository {
    pub fn new(config: RestConfig) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RepositoryError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    fn collection_path(kind: EventKind) -> &'static str {
        match kind {
            EventKind::Cleaning => "cleaning-tasks",
            EventKind::Production => "production-tasks",
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path.trim_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.authorization() {
            Some(value) => request.header("Authorization", value),
            None => request,
        }
    }

    async fn check_status(response: Response, context: ErrorContext) -> RepositoryResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let context = context.with_status(status.as_u16()).with_details(body.clone());

        Err(match status {
            StatusCode::NOT_FOUND => RepositoryError::not_found_with_context("Task not found", context),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                RepositoryError::validation_with_context(format!("Backend rejected change: {}", body), context)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::configuration(
                format!("Backend refused credentials ({})", status),
            ),
            _ => RepositoryError::upstream_with_context(format!("Backend error ({})", status), context),
        })
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        operation: &str,
    ) -> RepositoryResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next_url = Some(self.url(path));
        let mut first = true;

        while let Some(url) = next_url.take() {
            debug!("GET {}", url);
            let mut request = self.authorized(self.client.get(&url));
            // Pagination links already carry the query string.
            if first {
                request = request.query(query);
                first = false;
            }

            let response = request
                .send()
                .await
                .map_err(|e| RepositoryError::from(e).with_operation(operation))?;
            let response = Self::check_status(response, ErrorContext::new(operation)).await?;
            let page: ListResponse<T> = response
                .json()
                .await
                .map_err(|e| RepositoryError::from(e).with_operation(operation))?;

            match page {
                ListResponse::Plain(batch) => items.extend(batch),
                ListResponse::Paged { results, next } => {
                    items.extend(results);
                    next_url = next;
                }
            }
        }

        Ok(items)
    }

    async fn patch(&self, key: EventKey, body: Value, operation: &str) -> RepositoryResult<()> {
        let url = self.url(&format!("{}/{}", Self::collection_path(key.kind), key.id));
        debug!("PATCH {} {}", url, body);

        let response = self
            .authorized(self.client.patch(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?;

        let context = ErrorContext::new(operation)
            .with_entity(format!("{}_task", key.kind))
            .with_entity_id(key.id);
        Self::check_status(response, context).await?;
        Ok(())
    }
}

fn range_query(range: Option<DateRange>) -> Vec<(&'static str, String)> {
    match range {
        Some(range) => vec![
            ("start_date", range.start.to_rfc3339()),
            ("end_date", range.end.to_rfc3339()),
        ],
        None => vec![],
    }
}

fn assignee_value(resource: &ResourceId) -> Value {
    if resource.is_unassigned() {
        return Value::Null;
    }
    match resource.as_str().parse::<i64>() {
        Ok(id) => json!(id),
        Err(_) => json!(resource.as_str()),
    }
}

/// Build the PATCH body for a drop or resize.
pub(crate) fn schedule_body(kind: EventKind, change: &ScheduleChange) -> Value {
    let (start_field, end_field) = match kind {
        EventKind::Cleaning => ("start_time", "end_time"),
        EventKind::Production => ("scheduled_start", "scheduled_end"),
    };

    let mut body = Map::new();
    body.insert(start_field.to_string(), json!(change.start.to_rfc3339()));
    body.insert(
        end_field.to_string(),
        change.end.map(|e| json!(e.to_rfc3339())).unwrap_or(Value::Null),
    );

    if let Some(resource) = &change.resource_id {
        let line = resource
            .as_str()
            .strip_prefix("line-")
            .and_then(|id| id.parse::<i64>().ok());
        match (kind, line) {
            (EventKind::Production, Some(line)) => {
                body.insert("production_line".to_string(), json!(line));
                body.insert("assigned_to".to_string(), Value::Null);
            }
            (EventKind::Cleaning, Some(_)) => {
                warn!("Ignoring production line {} for cleaning task", resource);
            }
            (EventKind::Production, None) if resource.is_unassigned() => {
                body.insert("production_line".to_string(), Value::Null);
                body.insert("assigned_to".to_string(), Value::Null);
            }
            _ => {
                body.insert("assigned_to".to_string(), assignee_value(resource));
            }
        }
    }

    Value::Object(body)
}

#[async_trait]
impl TaskRepository for RestRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let response = self
            .authorized(self.client.get(self.url("users")))
            .query(&[("page_size", "1")])
            .send()
            .await;

        match response {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) if e.is_connect() || e.is_timeout() => Ok(false),
            Err(e) => Err(RepositoryError::from(e).with_operation("health_check")),
        }
    }

    async fn list_cleaning_tasks(
        &self,
        range: Option<DateRange>,
    ) -> RepositoryResult<Vec<CleaningTaskRecord>> {
        self.get_list(
            Self::collection_path(EventKind::Cleaning),
            &range_query(range),
            "list_cleaning_tasks",
        )
        .await
    }

    async fn list_production_tasks(
        &self,
        range: Option<DateRange>,
    ) -> RepositoryResult<Vec<ProductionTaskRecord>> {
        self.get_list(
            Self::collection_path(EventKind::Production),
            &range_query(range),
            "list_production_tasks",
        )
        .await
    }

    async fn list_users(&self) -> RepositoryResult<Vec<UserRecord>> {
        self.get_list("users", &[], "list_users").await
    }

    async fn list_production_lines(&self) -> RepositoryResult<Vec<ProductionLineRecord>> {
        self.get_list("production-lines", &[], "list_production_lines")
            .await
    }

    async fn update_schedule(
        &self,
        key: EventKey,
        change: &ScheduleChange,
    ) -> RepositoryResult<()> {
        self.patch(key, schedule_body(key.kind, change), "update_schedule")
            .await
    }

    async fn update_status(&self, key: EventKey, status: EventStatus) -> RepositoryResult<()> {
        self.patch(key, json!({ "status": status.as_str() }), "update_status")
            .await
    }
}
