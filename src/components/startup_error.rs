//! Startup Error Component
//!
//! Rendered instead of the app when it cannot start.

use leptos::prelude::*;

#[component]
pub fn StartupError(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="startup-error" role="alert">
            <h1>"Todo List is unavailable"</h1>
            <p>{message}</p>
        </div>
    }
}
