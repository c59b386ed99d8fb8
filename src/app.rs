//! Todo App
//!
//! Root component: owns the sync client for its lifetime and wires push
//! events into the controller.

use std::rc::Rc;

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::SyncClient;
use crate::components::{ErrorBanner, NewTodoForm, StartupError, TodoList};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::controller::TodoController;
use crate::store::{sync_store, TodoState, TodoStateStoreFields};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let store = Store::new(TodoState::default());

    // Acquire the push connection for as long as this view is mounted
    let client = match SyncClient::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("[APP] {}", e);
            return view! { <StartupError message=e.to_string() /> }.into_any();
        }
    };

    let controller = TodoController::new(Rc::new(client), move |state: &TodoState| sync_store(&store, state));
    controller.attach(controller.api().as_ref());

    let ctx = AppContext::new(controller, store);
    provide_context(ctx);
    provide_context(store);

    // Initial load, once per activation
    ctx.spawn(|c| async move { c.load().await });

    on_cleanup(move || ctx.dispose());

    let summary = move || {
        store.todos().with(|todos| {
            let done = todos.iter().filter(|t| t.completed).count();
            format!("{} items, {} completed", todos.len(), done)
        })
    };

    view! {
        <div class="todo-app">
            <h1>"Todo List"</h1>
            <ErrorBanner />
            <NewTodoForm />
            <TodoList />
            <p class="item-count">{summary}</p>
        </div>
    }
    .into_any()
}
