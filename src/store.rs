//! Todo List State
//!
//! The in-memory list plus the single edit target, with every transition the
//! controller applies. Mirrored into a `reactive_stores` store for rendering.

use std::collections::HashSet;

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::PushEvent;
use crate::models::{normalize_title, Todo, UpdateTodo};

/// Which row, if any, is in editing mode
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing { id: String, draft: String },
}

impl EditState {
    pub fn is_editing(&self, todo_id: &str) -> bool {
        matches!(self, EditState::Editing { id, .. } if id == todo_id)
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        matches!(self, EditState::Idle)
    }
}

/// Session state with field-level reactivity
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct TodoState {
    /// Todos in display order
    pub todos: Vec<Todo>,
    pub editing: EditState,
    /// Last command failure, shown until dismissed
    pub last_error: Option<String>,
    /// Ids deleted this session; a late create for one of them is dropped
    pub removed: HashSet<String>,
}

impl TodoState {
    pub fn find(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn replace_all(&mut self, mut todos: Vec<Todo>) {
        todos.retain(|t| !self.removed.contains(&t.id));
        self.todos = todos;
        if let EditState::Editing { id, .. } = &self.editing {
            if self.find(id).is_none() {
                self.editing = EditState::Idle;
            }
        }
    }

    /// Append a new todo; a second arrival of the same id replaces in place
    pub fn apply_created(&mut self, todo: Todo) {
        if self.removed.contains(&todo.id) {
            log::debug!("[TODO] Dropping create for deleted todo {}", todo.id);
            return;
        }
        match self.todos.iter_mut().find(|t| t.id == todo.id) {
            Some(existing) => *existing = todo,
            None => self.todos.push(todo),
        }
    }

    /// Replace a todo in place and leave editing mode for it
    pub fn apply_updated(&mut self, todo: Todo) {
        if self.editing.is_editing(&todo.id) {
            self.editing = EditState::Idle;
        }
        if let Some(existing) = self.todos.iter_mut().find(|t| t.id == todo.id) {
            *existing = todo;
        }
    }

    pub fn apply_deleted(&mut self, id: &str) {
        self.removed.insert(id.to_string());
        self.todos.retain(|t| t.id != id);
        if self.editing.is_editing(id) {
            self.editing = EditState::Idle;
        }
    }

    pub fn apply_event(&mut self, event: &PushEvent) {
        match event {
            PushEvent::Created(todo) => self.apply_created(todo.clone()),
            PushEvent::Updated(todo) => self.apply_updated(todo.clone()),
            PushEvent::Deleted(id) => self.apply_deleted(id),
        }
    }

    /// Flip `completed` locally, returning the value before the flip
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        let previous = todo.completed;
        todo.completed = !previous;
        Some(previous)
    }

    pub fn set_completed(&mut self, id: &str, completed: bool) {
        if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
            todo.completed = completed;
        }
    }

    /// Enter editing mode, replacing any other edit target
    pub fn start_edit(&mut self, id: &str) -> bool {
        let Some(todo) = self.find(id) else { return false };
        self.editing = EditState::Editing { id: todo.id.clone(), draft: todo.title.clone() };
        true
    }

    pub fn set_draft(&mut self, text: &str) {
        if let EditState::Editing { draft, .. } = &mut self.editing {
            *draft = text.to_string();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = EditState::Idle;
    }

    /// Build the save request from the draft and the live `completed` flag
    pub fn pending_save(&self) -> Option<SaveRequest> {
        let EditState::Editing { id, draft } = &self.editing else { return None };
        let todo = self.find(id)?;
        Some(SaveRequest {
            id: id.clone(),
            title: normalize_title(draft),
            completed: todo.completed,
        })
    }
}

/// Snapshot of an edit about to be saved; `title` is None for a blank draft
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveRequest {
    pub id: String,
    pub title: Option<String>,
    pub completed: bool,
}

impl SaveRequest {
    pub fn to_update(&self) -> Option<UpdateTodo> {
        self.title
            .as_ref()
            .map(|title| UpdateTodo::title_and_completed(title.clone(), self.completed))
    }
}

/// Type alias for the store
pub type TodoStore = Store<TodoState>;

/// Get the todo store from context
pub fn use_todo_store() -> TodoStore {
    expect_context::<TodoStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Copy changed fields from the controller state into the store
pub fn sync_store(store: &TodoStore, state: &TodoState) {
    if store.todos().with_untracked(|todos| todos != &state.todos) {
        *store.todos().write() = state.todos.clone();
    }
    if store.editing().with_untracked(|editing| editing != &state.editing) {
        *store.editing().write() = state.editing.clone();
    }
    if store.last_error().with_untracked(|err| err != &state.last_error) {
        *store.last_error().write() = state.last_error.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_todo(id: &str, title: &str, completed: bool) -> Todo {
        Todo { id: id.to_string(), title: title.to_string(), completed }
    }

    fn state_with(todos: Vec<Todo>) -> TodoState {
        TodoState { todos, ..Default::default() }
    }

    #[test]
    fn test_created_is_deduplicated_by_id() {
        let mut state = state_with(vec![make_todo("1", "Buy milk", false)]);
        state.apply_created(make_todo("2", "Walk dog", false));
        state.apply_created(make_todo("2", "Walk dog", false));

        assert_eq!(state.todos.len(), 2);
        assert_eq!(state.todos[1].id, "2");
    }

    #[test]
    fn test_created_after_delete_stays_deleted() {
        let mut state = state_with(vec![make_todo("1", "Buy milk", false)]);
        state.apply_event(&PushEvent::Created(make_todo("7", "Walk dog", false)));
        state.apply_event(&PushEvent::Deleted("7".to_string()));
        state.apply_created(make_todo("7", "Walk dog", false));

        assert_eq!(state.todos, vec![make_todo("1", "Buy milk", false)]);
    }

    #[test]
    fn test_replace_all_skips_deleted_ids() {
        let mut state = TodoState::default();
        state.apply_deleted("2");
        state.replace_all(vec![make_todo("1", "a", false), make_todo("2", "b", false)]);

        let ids: Vec<_> = state.todos.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_updated_replaces_in_place() {
        let mut state = state_with(vec![
            make_todo("1", "a", false),
            make_todo("2", "b", false),
            make_todo("3", "c", false),
        ]);
        state.apply_updated(make_todo("2", "b2", true));

        let ids: Vec<_> = state.todos.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(state.todos[1], make_todo("2", "b2", true));
    }

    #[test]
    fn test_updated_twice_is_idempotent() {
        let mut state = state_with(vec![make_todo("1", "a", false), make_todo("2", "b", false)]);
        state.start_edit("1");
        let event = PushEvent::Updated(make_todo("1", "a2", true));

        state.apply_event(&event);
        let after_first = state.clone();
        state.apply_event(&event);

        assert_eq!(state, after_first);
        assert!(state.editing.is_idle());
    }

    #[test]
    fn test_update_for_unknown_id_is_ignored() {
        let mut state = state_with(vec![make_todo("1", "a", false)]);
        state.apply_updated(make_todo("9", "ghost", false));
        assert_eq!(state.todos, vec![make_todo("1", "a", false)]);
    }

    #[test]
    fn test_remote_delete_exits_editing() {
        let mut state = state_with(vec![make_todo("1", "a", false), make_todo("2", "b", false)]);
        state.start_edit("2");
        state.apply_event(&PushEvent::Deleted("2".to_string()));

        assert_eq!(state.todos.len(), 1);
        assert!(state.editing.is_idle());
    }

    #[test]
    fn test_remote_delete_of_other_row_keeps_editing() {
        let mut state = state_with(vec![make_todo("1", "a", false), make_todo("2", "b", false)]);
        state.start_edit("2");
        state.apply_deleted("1");

        assert!(state.editing.is_editing("2"));
    }

    #[test]
    fn test_toggle_returns_previous_flag() {
        let mut state = state_with(vec![make_todo("1", "a", false)]);
        assert_eq!(state.toggle("1"), Some(false));
        assert!(state.todos[0].completed);
        assert_eq!(state.toggle("missing"), None);
    }

    #[test]
    fn test_start_edit_replaces_other_target() {
        let mut state = state_with(vec![make_todo("a", "Alpha", false), make_todo("b", "Beta", false)]);
        state.start_edit("b");
        state.set_draft("Beta edited");
        state.start_edit("a");

        assert_eq!(state.editing, EditState::Editing { id: "a".to_string(), draft: "Alpha".to_string() });
        assert!(!state.editing.is_editing("b"));
        assert_eq!(state.find("b").unwrap().title, "Beta");
    }

    #[test]
    fn test_pending_save_reads_live_completed_flag() {
        let mut state = state_with(vec![make_todo("1", "a", false)]);
        state.start_edit("1");
        state.set_draft("  renamed ");
        state.toggle("1");

        let save = state.pending_save().unwrap();
        assert_eq!(save.to_update(), Some(UpdateTodo::title_and_completed("renamed", true)));
    }

    #[test]
    fn test_pending_save_blank_draft_has_no_update() {
        let mut state = state_with(vec![make_todo("1", "a", false)]);
        state.start_edit("1");
        state.set_draft("   ");

        assert_eq!(state.pending_save().unwrap().to_update(), None);
    }

    #[test]
    fn test_replace_all_drops_stale_edit_target() {
        let mut state = state_with(vec![make_todo("1", "a", false)]);
        state.start_edit("1");
        state.replace_all(vec![make_todo("2", "b", false)]);
        assert!(state.editing.is_idle());
    }
}
