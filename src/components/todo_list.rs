//! Todo List Component
//!
//! Renders the todos in list order, one keyed row each.

use leptos::prelude::*;

use crate::components::TodoRow;
use crate::store::{use_todo_store, TodoStateStoreFields};

#[component]
pub fn TodoList() -> impl IntoView {
    let store = use_todo_store();

    view! {
        <ul class="todo-list">
            <For
                each=move || store.todos().get()
                // Key on every mutable field so a changed todo re-renders its row
                key=|todo| (todo.id.clone(), todo.title.clone(), todo.completed)
                children=move |todo| view! { <TodoRow todo=todo /> }
            />
        </ul>
    }
}
