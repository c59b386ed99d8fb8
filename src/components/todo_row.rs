//! Todo Row Component
//!
//! A single todo in display or editing mode.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::models::Todo;
use crate::store::{EditState, TodoStateStoreFields};

/// A single todo row
#[component]
pub fn TodoRow(todo: Todo) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let id = todo.id.clone();
    let completed = todo.completed;
    let title = todo.title.clone();

    let row_id = id.clone();
    let is_editing = move || store.editing().with(|e| e.is_editing(&row_id));
    let draft = move || {
        store.editing().with(|e| match e {
            EditState::Editing { draft, .. } => draft.clone(),
            EditState::Idle => String::new(),
        })
    };

    let toggle_id = id.clone();
    let on_toggle = move |_| {
        let id = toggle_id.clone();
        ctx.spawn(move |c| async move { c.toggle(&id).await });
    };

    let save = move || ctx.spawn(|c| async move { c.save_edit().await });
    let cancel = move || ctx.with(|c| c.cancel_edit());

    let edit_id = id.clone();
    let delete_id = id.clone();

    view! {
        <li class=move || if completed { "todo-row completed" } else { "todo-row" }>
            // Checkbox
            <input
                type="checkbox"
                prop:checked=completed
                on:change=on_toggle
            />

            <Show
                when=is_editing.clone()
                fallback=move || {
                    let edit_id = edit_id.clone();
                    let delete_id = delete_id.clone();
                    view! {
                        <span class="todo-title">{title.clone()}</span>
                        <div class="todo-actions">
                            <button class="edit-btn" on:click=move |_| ctx.with(|c| c.start_edit(&edit_id))>
                                "Edit"
                            </button>
                            <button class="delete-btn" on:click=move |_| {
                                let id = delete_id.clone();
                                ctx.spawn(move |c| async move { c.delete(&id).await });
                            }>
                                "Delete"
                            </button>
                        </div>
                    }
                }
            >
                <div class="todo-edit">
                    <input
                        type="text"
                        autofocus=true
                        prop:value=draft.clone()
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            ctx.with(|c| c.set_draft(&text));
                        }
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            match ev.key().as_str() {
                                "Enter" => save(),
                                "Escape" => cancel(),
                                _ => {}
                            }
                        }
                    />
                    <button class="save-btn" on:click=move |_| save()>"Save"</button>
                    <button class="cancel-btn" on:click=move |_| cancel()>"Cancel"</button>
                </div>
            </Show>
        </li>
    }
}
