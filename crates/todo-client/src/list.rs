use crate::api::{TodoApi, TodoSummary};
use crate::guard::TokenGuard;
use crate::notify::{Notifier, Toast};
use std::sync::Arc;
use tracing::error;

pub const LOAD_FAILED_MESSAGE: &str = "Could not load todos.";
pub const EMPTY_MESSAGE: &str = "You're all caught up! Add a new Todo.🎉";
pub const DELETE_CONFIRMATION: &str = "Delete this todo?";

const TODO_CREATED: &str = "Todo created!";
const TODO_UPDATED: &str = "Todo updated!";
const TODO_DELETED: &str = "Todo deleted.";
const ENTER_A_TODO: &str = "Please enter a todo.";
const TODO_NOT_FOUND: &str = "Todo not found";
const EDIT_TARGET_NOT_FOUND: &str = "Todo not found.";
const FIELD_EMPTY: &str = "The field cannot be empty";
const CREATE_ERROR: &str = "Error creating todo.";
const TOGGLE_ERROR: &str = "Failed to update todo.";
const EDIT_ERROR: &str = "Error updating todo.";
const DELETE_ERROR: &str = "Error deleting todo.";
const INVALID_TODO_ID: &str = "Invalid Todo ID";

/// 削除前の確認
pub trait Confirmer: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// 描画すべき状態
#[derive(Debug, PartialEq, Eq)]
pub enum ListView<'a> {
    Loading,
    Failed(&'a str),
    Empty,
    Items(&'a [TodoSummary]),
}

/// ToDo 一覧のビューモデル
///
/// ローカル状態はサーバーが成功を返した後にだけ変更する。失敗時は通知のみで
/// 状態はそのまま残る。
pub struct TodoList {
    api: Arc<dyn TodoApi>,
    guard: TokenGuard,
    notifier: Arc<dyn Notifier>,
    confirmer: Option<Box<dyn Confirmer>>,
    todos: Vec<TodoSummary>,
    input: String,
    editing: Option<TodoSummary>,
    loading: bool,
    error: Option<String>,
}

impl TodoList {
    pub fn new(api: Arc<dyn TodoApi>, guard: TokenGuard, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            guard,
            notifier,
            confirmer: None,
            todos: Vec::new(),
            input: String::new(),
            editing: None,
            loading: true,
            error: None,
        }
    }

    pub fn with_confirmer(mut self, confirmer: Box<dyn Confirmer>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    pub fn todos(&self) -> &[TodoSummary] {
        &self.todos
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn editing(&self) -> Option<&TodoSummary> {
        self.editing.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn guard(&self) -> &TokenGuard {
        &self.guard
    }

    pub fn guard_mut(&mut self) -> &mut TokenGuard {
        &mut self.guard
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn view(&self) -> ListView<'_> {
        if self.loading {
            ListView::Loading
        } else if let Some(error) = &self.error {
            ListView::Failed(error)
        } else if self.todos.is_empty() {
            ListView::Empty
        } else {
            ListView::Items(&self.todos)
        }
    }

    pub fn placeholder(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit your todo"
        } else {
            "Enter a new todo"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.editing.is_some() {
            "Save"
        } else {
            "Add"
        }
    }

    /// 初回表示時の一覧取得。認証情報が無ければ何もしない
    pub async fn load(&mut self) {
        let Some(token) = self.guard.token().map(str::to_string) else {
            return;
        };

        match self.api.list_todos(&token).await {
            Ok(todos) => self.todos = todos,
            Err(e) => {
                error!(error = %e, "ToDo一覧の取得に失敗");
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
            }
        }
        self.loading = false;
    }

    /// 入力欄の送信。編集中なら保存、そうでなければ作成
    pub async fn submit(&mut self) {
        if self.editing.is_some() {
            self.save_edit().await;
        } else {
            self.create().await;
        }
    }

    pub async fn create(&mut self) {
        let Some(token) = self.guard.require_token() else {
            return;
        };
        let title = self.input.trim().to_string();
        if title.is_empty() {
            self.notify(Toast::error(ENTER_A_TODO));
            return;
        }

        self.loading = true;
        match self.api.create_todo(&title, &token).await {
            Ok(todo) => {
                self.notify(Toast::success(TODO_CREATED));
                self.todos.push(todo);
                self.input.clear();
            }
            Err(e) => {
                error!(error = %e, "ToDoの作成に失敗");
                self.notify(Toast::error(CREATE_ERROR));
            }
        }
        self.loading = false;
    }

    pub async fn toggle_complete(&mut self, todo_id: &str) {
        let Some(token) = self.guard.require_token() else {
            return;
        };
        let Some(todo) = self.find(todo_id).cloned() else {
            self.notify(Toast::error(TODO_NOT_FOUND));
            return;
        };

        let completed = !todo.completed;
        match self
            .api
            .update_todo(&todo.todo_id, &todo.title, completed, &token)
            .await
        {
            Ok(()) => {
                self.notify(Toast::success(TODO_UPDATED));
                if let Some(local) = self.find_mut(todo_id) {
                    local.completed = completed;
                }
            }
            Err(e) => {
                error!(error = %e, "完了状態の更新に失敗");
                self.notify(Toast::error(TOGGLE_ERROR));
            }
        }
    }

    /// 入力欄を既存タイトルで埋めて編集モードに入る
    pub fn begin_edit(&mut self, todo_id: &str) {
        let Some(todo) = self.find(todo_id).cloned() else {
            self.notify(Toast::error(EDIT_TARGET_NOT_FOUND));
            return;
        };

        self.input = todo.title.clone();
        self.editing = Some(todo);
    }

    pub async fn save_edit(&mut self) {
        let Some(token) = self.guard.require_token() else {
            return;
        };
        let Some(editing) = self.editing.clone() else {
            return;
        };

        let title = self.input.trim().to_string();
        if title.is_empty() {
            self.notify(Toast::error(FIELD_EMPTY));
            return;
        }

        // 編集中に切り替えられた完了状態を巻き戻さない
        let completed = self
            .find(&editing.todo_id)
            .map_or(editing.completed, |t| t.completed);

        match self
            .api
            .update_todo(&editing.todo_id, &title, completed, &token)
            .await
        {
            Ok(()) => {
                if let Some(local) = self.find_mut(&editing.todo_id) {
                    local.title = title;
                }
                self.notify(Toast::success(TODO_UPDATED));
                self.cancel_edit();
            }
            Err(e) => {
                error!(error = %e, "タイトルの更新に失敗");
                self.notify(Toast::error(EDIT_ERROR));
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.input.clear();
    }

    pub async fn delete(&mut self, todo_id: &str) {
        let Some(token) = self.guard.require_token() else {
            return;
        };
        if self.find(todo_id).is_none() {
            self.notify(Toast::error(INVALID_TODO_ID));
            return;
        }
        if let Some(confirmer) = &self.confirmer {
            if !confirmer.confirm(DELETE_CONFIRMATION) {
                return;
            }
        }

        match self.api.delete_todo(todo_id, &token).await {
            Ok(()) => {
                self.todos.retain(|t| t.todo_id != todo_id);
                if self.editing.as_ref().is_some_and(|t| t.todo_id == todo_id) {
                    self.cancel_edit();
                }
                self.notify(Toast::success(TODO_DELETED));
            }
            Err(e) => {
                error!(error = %e, "ToDoの削除に失敗");
                self.notify(Toast::error(DELETE_ERROR));
            }
        }
    }

    fn find(&self, todo_id: &str) -> Option<&TodoSummary> {
        self.todos.iter().find(|t| t.todo_id == todo_id)
    }

    fn find_mut(&mut self, todo_id: &str) -> Option<&mut TodoSummary> {
        self.todos.iter_mut().find(|t| t.todo_id == todo_id)
    }

    fn notify(&self, toast: Toast) {
        self.notifier.notify(toast);
    }
}
