//! 一覧ビューモデルのシナリオテスト（インメモリの偽 API を使用）

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use todo_client::{
    ClientError, Confirmer, ListView, MemoryNotifier, Session, Toast, ToastKind, TodoApi,
    TodoList, TodoSummary, TokenGuard, EMPTY_MESSAGE, LOAD_FAILED_MESSAGE, LOGIN_REQUIRED_MESSAGE,
};

/// サーバー側の状態を持つ偽 API
#[derive(Default)]
struct FakeApi {
    todos: Mutex<Vec<TodoSummary>>,
    failing: AtomicBool,
    calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeApi {
    fn with(todos: Vec<TodoSummary>) -> Self {
        Self {
            todos: Mutex::new(todos),
            ..Default::default()
        }
    }

    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn server_todos(&self) -> Vec<TodoSummary> {
        self.todos.lock().unwrap().clone()
    }

    fn check(&self, token: &str, message: &str) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!token.is_empty());
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::RequestFailed(message.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoApi for FakeApi {
    async fn create_todo(&self, title: &str, token: &str) -> Result<TodoSummary, ClientError> {
        self.check(token, "Failed to create todo")?;
        let todo = TodoSummary {
            todo_id: format!("t-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            title: title.to_string(),
            completed: false,
        };
        self.todos.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn list_todos(&self, token: &str) -> Result<Vec<TodoSummary>, ClientError> {
        self.check(token, "Failed to fetch todos")?;
        Ok(self.server_todos())
    }

    async fn update_todo(
        &self,
        todo_id: &str,
        title: &str,
        completed: bool,
        token: &str,
    ) -> Result<(), ClientError> {
        self.check(token, "Failed to update todo")?;
        let mut todos = self.todos.lock().unwrap();
        let todo = todos
            .iter_mut()
            .find(|t| t.todo_id == todo_id)
            .ok_or_else(|| ClientError::RequestFailed("Failed to update todo".to_string()))?;
        todo.title = title.to_string();
        todo.completed = completed;
        Ok(())
    }

    async fn delete_todo(&self, todo_id: &str, token: &str) -> Result<(), ClientError> {
        self.check(token, "Failed to delete todo")?;
        self.todos.lock().unwrap().retain(|t| t.todo_id != todo_id);
        Ok(())
    }
}

struct Answer(bool);

impl Confirmer for Answer {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

fn summary(id: &str, title: &str, completed: bool) -> TodoSummary {
    TodoSummary {
        todo_id: id.to_string(),
        title: title.to_string(),
        completed,
    }
}

fn signed_in() -> Option<Session> {
    let claims = json!({
        "sub": "user-1",
        "cognito:username": "alice",
        "exp": Utc::now().timestamp() + 3600
    });
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"k")).unwrap();
    Some(Session::from_id_token(&token).unwrap())
}

fn setup(
    api: FakeApi,
    session: Option<Session>,
) -> (TodoList, Arc<FakeApi>, Arc<MemoryNotifier>) {
    let api = Arc::new(api);
    let notifier = Arc::new(MemoryNotifier::new());
    let guard = TokenGuard::new(session, notifier.clone());
    let list = TodoList::new(api.clone(), guard, notifier.clone());
    (list, api, notifier)
}

fn errors(notifier: &MemoryNotifier) -> Vec<String> {
    notifier
        .take()
        .into_iter()
        .filter(|t| t.kind == ToastKind::Error)
        .map(|t| t.message)
        .collect()
}

#[tokio::test]
async fn test_load_shows_items_or_empty_state() {
    let (mut list, _, _) = setup(FakeApi::default(), signed_in());
    assert_eq!(list.view(), ListView::Loading);

    list.load().await;
    assert_eq!(list.view(), ListView::Empty);
    assert!(!EMPTY_MESSAGE.is_empty());

    let (mut list, _, _) = setup(FakeApi::with(vec![summary("a", "Buy milk", false)]), signed_in());
    list.load().await;
    assert_eq!(list.view(), ListView::Items(&[summary("a", "Buy milk", false)]));
}

#[tokio::test]
async fn test_load_failure_sets_error() {
    let api = FakeApi::default();
    api.fail(true);
    let (mut list, _, _) = setup(api, signed_in());

    list.load().await;

    assert!(!list.is_loading());
    assert_eq!(list.view(), ListView::Failed(LOAD_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_load_without_session_does_not_call_api() {
    let (mut list, api, notifier) = setup(FakeApi::default(), None);

    list.load().await;

    assert_eq!(api.calls(), 0);
    assert!(notifier.toasts().is_empty());
    assert_eq!(list.view(), ListView::Loading);
}

#[tokio::test]
async fn test_create_appends_server_item() {
    let (mut list, api, notifier) = setup(FakeApi::default(), signed_in());
    list.load().await;

    list.set_input("  Buy milk ");
    list.submit().await;

    assert_eq!(list.todos(), &[summary("t-0", "Buy milk", false)]);
    assert_eq!(list.input(), "");
    assert_eq!(api.server_todos(), list.todos());
    assert_eq!(notifier.last(), Some(Toast::success("Todo created!")));
}

#[tokio::test]
async fn test_create_requires_input_and_credential() {
    let (mut list, api, notifier) = setup(FakeApi::default(), signed_in());
    list.set_input("   ");
    list.create().await;
    assert_eq!(errors(&notifier), vec!["Please enter a todo."]);

    let (mut list, api2, notifier2) = setup(FakeApi::default(), None);
    list.set_input("Buy milk");
    list.create().await;
    assert_eq!(errors(&notifier2), vec![LOGIN_REQUIRED_MESSAGE]);

    assert_eq!(api.calls() + api2.calls(), 0);
}

#[tokio::test]
async fn test_create_failure_keeps_state() {
    let (mut list, api, notifier) = setup(FakeApi::default(), signed_in());
    list.load().await;
    api.fail(true);

    list.set_input("Buy milk");
    list.create().await;

    assert!(list.todos().is_empty());
    assert_eq!(list.input(), "Buy milk");
    assert!(!list.is_loading());
    assert_eq!(errors(&notifier), vec!["Error creating todo."]);
}

#[tokio::test]
async fn test_toggle_complete_is_pessimistic() {
    let (mut list, api, notifier) = setup(FakeApi::with(vec![summary("a", "Buy milk", false)]), signed_in());
    list.load().await;

    list.toggle_complete("a").await;
    assert!(list.todos()[0].completed);
    assert!(api.server_todos()[0].completed);

    api.fail(true);
    list.toggle_complete("a").await;
    assert!(list.todos()[0].completed);
    assert_eq!(errors(&notifier), vec!["Failed to update todo."]);

    list.toggle_complete("missing").await;
    assert_eq!(errors(&notifier), vec!["Todo not found"]);
}

#[tokio::test]
async fn test_inline_edit_flow() {
    let (mut list, api, notifier) = setup(FakeApi::with(vec![summary("a", "Buy milk", false)]), signed_in());
    list.load().await;

    list.begin_edit("a");
    assert_eq!(list.input(), "Buy milk");
    assert_eq!(list.placeholder(), "Edit your todo");
    assert_eq!(list.submit_label(), "Save");

    list.set_input("   ");
    list.submit().await;
    assert_eq!(errors(&notifier), vec!["The field cannot be empty"]);
    assert!(list.editing().is_some());

    list.set_input("Buy oat milk ");
    list.submit().await;
    assert_eq!(list.todos()[0].title, "Buy oat milk");
    assert_eq!(api.server_todos()[0].title, "Buy oat milk");
    assert!(list.editing().is_none());
    assert_eq!(list.input(), "");
    assert_eq!(list.placeholder(), "Enter a new todo");
    assert_eq!(list.submit_label(), "Add");
}

#[tokio::test]
async fn test_edit_does_not_revert_completed() {
    let (mut list, api, _) = setup(FakeApi::with(vec![summary("a", "Buy milk", false)]), signed_in());
    list.load().await;

    list.begin_edit("a");
    list.toggle_complete("a").await;
    list.set_input("Buy bread");
    list.save_edit().await;

    assert_eq!(api.server_todos(), vec![summary("a", "Buy bread", true)]);
    assert_eq!(list.todos(), api.server_todos().as_slice());
}

#[tokio::test]
async fn test_edit_failure_and_cancel() {
    let (mut list, api, notifier) = setup(FakeApi::with(vec![summary("a", "Buy milk", false)]), signed_in());
    list.load().await;

    list.begin_edit("a");
    list.set_input("Changed");
    api.fail(true);
    list.save_edit().await;
    assert_eq!(errors(&notifier), vec!["Error updating todo."]);
    assert_eq!(list.todos()[0].title, "Buy milk");
    assert!(list.editing().is_some());

    list.cancel_edit();
    assert!(list.editing().is_none());
    assert_eq!(list.input(), "");

    list.begin_edit("nope");
    assert_eq!(errors(&notifier), vec!["Todo not found."]);
}

#[tokio::test]
async fn test_delete_flow() {
    let todos = vec![summary("a", "one", false), summary("b", "two", true)];
    let (mut list, api, notifier) = setup(FakeApi::with(todos), signed_in());
    list.load().await;

    list.delete("zzz").await;
    assert_eq!(errors(&notifier), vec!["Invalid Todo ID"]);

    api.fail(true);
    list.delete("a").await;
    assert_eq!(list.todos().len(), 2);
    assert_eq!(errors(&notifier), vec!["Error deleting todo."]);

    api.fail(false);
    list.delete("a").await;
    assert_eq!(list.todos(), &[summary("b", "two", true)]);
    assert_eq!(notifier.last(), Some(Toast::success("Todo deleted.")));
}

#[tokio::test]
async fn test_delete_respects_confirmation() {
    let (list, api, _) = setup(FakeApi::with(vec![summary("a", "one", false)]), signed_in());
    let mut list = list.with_confirmer(Box::new(Answer(false)));
    list.load().await;
    let calls = api.calls();

    list.delete("a").await;

    assert_eq!(api.calls(), calls);
    assert_eq!(list.todos().len(), 1);
}

#[tokio::test]
async fn test_mutations_without_credential_are_short_circuited() {
    let (mut list, api, notifier) = setup(FakeApi::with(vec![summary("a", "one", false)]), None);

    list.toggle_complete("a").await;
    list.delete("a").await;
    list.begin_edit("a");
    list.save_edit().await;

    assert_eq!(api.calls(), 0);
    assert!(errors(&notifier)
        .iter()
        .all(|message| message == LOGIN_REQUIRED_MESSAGE || message.starts_with("Todo not found")));
}
