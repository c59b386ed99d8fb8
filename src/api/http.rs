//! REST Bindings
//!
//! `reqwest` wrappers for the `/todos` resource.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::TodoApi;
use crate::config::AppConfig;
use crate::error::{TodoError, TodoResult};
use crate::models::{CreateTodo, Todo, UpdateTodo};

/// Characters escaped when an id is used as a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub struct HttpApi {
    client: Client,
    base: String,
}

impl HttpApi {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base: config.api_base().as_str().trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> TodoResult<Url> {
        Url::parse(&format!("{}/todos", self.base)).map_err(|e| TodoError::Network(e.to_string()))
    }

    fn item_url(&self, id: &str) -> TodoResult<Url> {
        let segment = utf8_percent_encode(id, PATH_SEGMENT);
        Url::parse(&format!("{}/todos/{}", self.base, segment)).map_err(|e| TodoError::Network(e.to_string()))
    }
}

/// Map a response status onto the error taxonomy
fn check_status(response: Response, id: Option<&str>) -> TodoResult<Response> {
    match status_error(response.status(), response.url(), id) {
        Some(err) => Err(err),
        None => Ok(response),
    }
}

fn status_error(status: StatusCode, url: &Url, id: Option<&str>) -> Option<TodoError> {
    if status.is_success() {
        return None;
    }
    Some(match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => TodoError::NotFound(id.to_string()),
        _ => TodoError::Network(format!("{} {}", status, url)),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> TodoResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| TodoError::Network(format!("Response error: {}", e)))
}

#[async_trait(?Send)]
impl TodoApi for HttpApi {
    async fn fetch_all(&self) -> TodoResult<Vec<Todo>> {
        let response = self.client.get(self.collection_url()?).send().await?;
        decode(check_status(response, None)?).await
    }

    async fn create(&self, request: &CreateTodo) -> TodoResult<Todo> {
        let response = self.client.post(self.collection_url()?).json(request).send().await?;
        decode(check_status(response, None)?).await
    }

    async fn update(&self, id: &str, request: &UpdateTodo) -> TodoResult<Todo> {
        let response = self.client.patch(self.item_url(id)?).json(request).send().await?;
        decode(check_status(response, Some(id))?).await
    }

    async fn delete(&self, id: &str) -> TodoResult<()> {
        let response = self.client.delete(self.item_url(id)?).send().await?;
        check_status(response, Some(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpApi {
        HttpApi::new(&AppConfig::parse(Some(base)).unwrap())
    }

    #[test]
    fn test_collection_url() {
        assert_eq!(api("http://localhost:3001").collection_url().unwrap().as_str(), "http://localhost:3001/todos");
        assert_eq!(api("https://example.com/api/").collection_url().unwrap().as_str(), "https://example.com/api/todos");
    }

    #[test]
    fn test_item_url_encodes_id() {
        let api = api("http://localhost:3001");
        assert_eq!(
            api.item_url("65a1f0c2e4b0").unwrap().as_str(),
            "http://localhost:3001/todos/65a1f0c2e4b0"
        );
        assert_eq!(
            api.item_url("a/b?c d").unwrap().as_str(),
            "http://localhost:3001/todos/a%2Fb%3Fc%20d"
        );
    }

    #[test]
    fn test_success_status_passes() {
        let api = api("http://localhost:3001");
        let url = api.collection_url().unwrap();
        assert!(status_error(StatusCode::OK, &url, None).is_none());
        assert!(status_error(StatusCode::CREATED, &url, None).is_none());
        assert!(status_error(StatusCode::NO_CONTENT, &api.item_url("1").unwrap(), Some("1")).is_none());
    }

    #[test]
    fn test_not_found_for_item_is_not_found() {
        let url = api("http://localhost:3001").item_url("42").unwrap();
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, &url, Some("42")),
            Some(TodoError::NotFound("42".to_string()))
        );
    }

    #[test]
    fn test_other_failures_are_network_errors() {
        let api = api("http://localhost:3001");
        let collection = api.collection_url().unwrap();
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, &collection, None),
            Some(TodoError::Network("404 Not Found http://localhost:3001/todos".to_string()))
        );
        assert_eq!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, &api.item_url("42").unwrap(), Some("42")),
            Some(TodoError::Network("500 Internal Server Error http://localhost:3001/todos/42".to_string()))
        );
    }
}
