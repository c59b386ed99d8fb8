//! Todo Controller
//!
//! Issues commands against a [`TodoApi`] and reconciles responses and push
//! events into [`TodoState`]. All failures stop here: they are logged and
//! recorded in `last_error`, never propagated.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{EventKind, PushEvent, PushSource, TodoApi};
use crate::error::TodoError;
use crate::models::{normalize_title, CreateTodo, UpdateTodo};
use crate::store::TodoState;

type ChangeNotifier = Rc<dyn Fn(&TodoState)>;

/// Apply one synchronous change, then notify. Never held across an await.
fn apply<R>(state: &RefCell<TodoState>, notify: &ChangeNotifier, f: impl FnOnce(&mut TodoState) -> R) -> R {
    let result = f(&mut state.borrow_mut());
    notify(&state.borrow());
    result
}

fn apply_push(state: &RefCell<TodoState>, notify: &ChangeNotifier, event: &PushEvent) {
    log::debug!("[TODO] Push {:?}", event);
    apply(state, notify, |s| s.apply_event(event));
}

pub struct TodoController<A: TodoApi> {
    api: Rc<A>,
    state: Rc<RefCell<TodoState>>,
    notify: ChangeNotifier,
}

impl<A: TodoApi> Clone for TodoController<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
            notify: self.notify.clone(),
        }
    }
}

impl<A: TodoApi + 'static> TodoController<A> {
    pub fn new(api: Rc<A>, notify: impl Fn(&TodoState) + 'static) -> Self {
        Self {
            api,
            state: Rc::new(RefCell::new(TodoState::default())),
            notify: Rc::new(notify),
        }
    }

    pub fn api(&self) -> &Rc<A> {
        &self.api
    }

    pub fn snapshot(&self) -> TodoState {
        self.state.borrow().clone()
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut TodoState) -> R) -> R {
        apply(&self.state, &self.notify, f)
    }

    fn fail(&self, context: &str, err: TodoError) {
        match &err {
            TodoError::Validation(_) => log::warn!("[TODO] {}: {}", context, err),
            _ => log::error!("[TODO] {}: {}", context, err),
        }
        let message = format!("{}: {}", context, err);
        self.mutate(|state| state.last_error = Some(message));
    }

    /// Register for all three push event kinds
    ///
    /// Callbacks capture only the state and notifier, so a source owned by the
    /// api does not keep the controller alive.
    pub fn attach(&self, source: &impl PushSource) {
        for kind in EventKind::ALL {
            let state = self.state.clone();
            let notify = self.notify.clone();
            source.subscribe(
                kind,
                Rc::new(move |event: &PushEvent| apply_push(&state, &notify, event)),
            );
        }
    }

    /// Initial fetch; on failure the list stays empty
    pub async fn load(&self) {
        match self.api.fetch_all().await {
            Ok(todos) => {
                log::info!("[TODO] Loaded {} todos", todos.len());
                self.mutate(|state| state.replace_all(todos));
            }
            Err(e) => self.fail("Failed to load todos", e),
        }
    }

    /// Create a todo; returns true once the server accepted it
    pub async fn create(&self, title: &str) -> bool {
        let Some(title) = normalize_title(title) else {
            self.fail("Failed to create todo", TodoError::Validation("title is empty".to_string()));
            return false;
        };
        match self.api.create(&CreateTodo { title }).await {
            Ok(todo) => {
                self.mutate(|state| state.apply_created(todo));
                true
            }
            Err(e) => {
                self.fail("Failed to create todo", e);
                false
            }
        }
    }

    /// Optimistic completion flip, reverted if the server refuses it
    pub async fn toggle(&self, id: &str) {
        let Some(previous) = self.mutate(|state| state.toggle(id)) else {
            log::debug!("[TODO] Toggle for unknown todo {}", id);
            return;
        };
        if let Err(e) = self.api.update(id, &UpdateTodo::completed(!previous)).await {
            self.mutate(|state| state.set_completed(id, previous));
            self.fail("Failed to toggle todo", e);
        }
    }

    pub fn start_edit(&self, id: &str) {
        self.mutate(|state| state.start_edit(id));
    }

    pub fn set_draft(&self, text: &str) {
        self.mutate(|state| state.set_draft(text));
    }

    pub fn cancel_edit(&self) {
        self.mutate(|state| state.cancel_edit());
    }

    /// Save the draft together with the item's current completed flag
    pub async fn save_edit(&self) {
        let Some(save) = self.state.borrow().pending_save() else {
            return;
        };
        let Some(update) = save.to_update() else {
            self.fail("Failed to update todo", TodoError::Validation("title is empty".to_string()));
            return;
        };
        match self.api.update(&save.id, &update).await {
            Ok(todo) => self.mutate(|state| state.apply_updated(todo)),
            Err(e) => self.fail("Failed to update todo", e),
        }
    }

    /// Delete without optimistic removal; the row goes once the server confirms
    pub async fn delete(&self, id: &str) {
        match self.api.delete(id).await {
            Ok(()) => self.mutate(|state| state.apply_deleted(id)),
            Err(e) => self.fail("Failed to delete todo", e),
        }
    }

    pub fn dismiss_error(&self) {
        self.mutate(|state| state.last_error = None);
    }
}
