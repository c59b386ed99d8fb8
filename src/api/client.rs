//! Combined REST + push client handed to the controller.

use async_trait::async_trait;

use super::{EventCallback, EventKind, HttpApi, PushChannel, PushSource, TodoApi};
use crate::config::AppConfig;
use crate::error::TodoResult;
use crate::models::{CreateTodo, Todo, UpdateTodo};

pub struct SyncClient {
    http: HttpApi,
    push: PushChannel,
}

impl SyncClient {
    /// Open the push channel and join the shared room
    pub fn connect(config: &AppConfig) -> TodoResult<Self> {
        let socket_url = config.socket_url()?;
        let push = PushChannel::connect(socket_url.as_str())?;
        Ok(Self { http: HttpApi::new(config), push })
    }

    /// Release the push connection; later events are dropped
    pub fn dispose(&self) {
        self.push.dispose();
    }
}

#[async_trait(?Send)]
impl TodoApi for SyncClient {
    async fn fetch_all(&self) -> TodoResult<Vec<Todo>> {
        self.http.fetch_all().await
    }

    async fn create(&self, request: &CreateTodo) -> TodoResult<Todo> {
        self.http.create(request).await
    }

    async fn update(&self, id: &str, request: &UpdateTodo) -> TodoResult<Todo> {
        self.http.update(id, request).await
    }

    async fn delete(&self, id: &str) -> TodoResult<()> {
        self.http.delete(id).await
    }
}

impl PushSource for SyncClient {
    fn subscribe(&self, kind: EventKind, callback: EventCallback) {
        self.push.subscribe(kind, callback);
    }
}
