//! New Todo Form Component
//!
//! Form for creating new todos.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::models::normalize_title;

/// Form for creating a todo; the row appears once the server answers
#[component]
pub fn NewTodoForm() -> impl IntoView {
    let ctx = use_app_context();

    let (new_title, set_new_title) = signal(String::new());

    let create_todo = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let title = new_title.get();
        if normalize_title(&title).is_none() {
            return;
        }
        ctx.spawn(move |c| async move {
            if c.create(&title).await {
                set_new_title.set(String::new());
            }
        });
    };

    view! {
        <form class="new-todo-form" on:submit=create_todo>
            <input
                type="text"
                placeholder="Add a new todo..."
                prop:value=move || new_title.get()
                on:input=move |ev| set_new_title.set(event_target_value(&ev))
            />
            <button type="submit">"Add Todo"</button>
        </form>
    }
}
