//! Error Banner Component
//!
//! Shows the last failed command until dismissed or until it times out, with
//! the most recent logged warnings underneath.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;

use crate::context::use_app_context;
use crate::logging;
use crate::store::TodoStateStoreFields;

const AUTO_DISMISS_MS: u32 = 5_000;
const RECENT_LOG_LINES: usize = 5;

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    // Clear after a delay unless a newer error replaced it meanwhile
    Effect::new(move |_| {
        if let Some(shown) = store.last_error().get() {
            ctx.spawn(move |c| async move {
                TimeoutFuture::new(AUTO_DISMISS_MS).await;
                if c.snapshot().last_error.as_deref() == Some(shown.as_str()) {
                    c.dismiss_error();
                }
            });
        }
    });

    // Re-read the log buffer each time a new error is shown
    let recent_lines = move || {
        store.last_error().track();
        logging::recent_problems(RECENT_LOG_LINES)
            .into_iter()
            .map(|entry| view! { <li class="log-line">{entry.to_string()}</li> })
            .collect_view()
    };

    view! {
        <Show when=move || store.last_error().with(Option::is_some)>
            <div class="error-banner" role="alert">
                <span class="error-text">{move || store.last_error().get().unwrap_or_default()}</span>
                <button class="dismiss-btn" on:click=move |_| ctx.with(|c| c.dismiss_error())>"×"</button>
                <details class="error-log">
                    <summary>"Recent log"</summary>
                    <ul>{recent_lines}</ul>
                </details>
            </div>
        </Show>
    }
}
