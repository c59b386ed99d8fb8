//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::SyncClient;
use crate::controller::TodoController;
use crate::store::TodoStore;

pub type AppController = TodoController<SyncClient>;

/// App-wide handles; both are arena keys, so the context is `Copy`
#[derive(Clone, Copy)]
pub struct AppContext {
    controller: StoredValue<AppController, LocalStorage>,
    /// Reactive mirror of the controller state
    pub store: TodoStore,
}

impl AppContext {
    pub fn new(controller: AppController, store: TodoStore) -> Self {
        Self {
            controller: StoredValue::new_local(controller),
            store,
        }
    }

    /// Run a synchronous controller command
    pub fn with(&self, f: impl FnOnce(&AppController)) {
        if self.controller.try_with_value(f).is_none() {
            log::debug!("[APP] Controller already disposed");
        }
    }

    /// Spawn an async controller command on the event loop
    pub fn spawn<F, Fut>(&self, f: F)
    where
        F: FnOnce(AppController) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        match self.controller.try_with_value(|c| c.clone()) {
            Some(controller) => spawn_local(f(controller)),
            None => log::debug!("[APP] Controller already disposed"),
        }
    }

    /// Release the push connection
    pub fn dispose(&self) {
        self.with(|c| c.api().dispose());
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
