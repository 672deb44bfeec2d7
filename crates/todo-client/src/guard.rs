use crate::notify::{Notifier, Toast};
use crate::session::Session;
use chrono::Utc;
use std::sync::Arc;

pub const LOGIN_REQUIRED_MESSAGE: &str = "You must be logged in to perform this action.";

/// 現在の認証情報へのアクセスを仲介する
pub struct TokenGuard {
    session: Option<Session>,
    notifier: Arc<dyn Notifier>,
}

impl TokenGuard {
    pub fn new(session: Option<Session>, notifier: Arc<dyn Notifier>) -> Self {
        Self { session, notifier }
    }

    /// サインイン・サインアウト時に差し替える
    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// 現在の ID トークン（無ければ None、通知はしない）
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(Session::id_token)
    }

    /// 有効な ID トークンを要求する
    ///
    /// 無い・期限切れの場合はログインを促す通知を出して None を返す。
    pub fn require_token(&self) -> Option<String> {
        match &self.session {
            Some(session) if !session.is_expired_at(Utc::now()) => {
                Some(session.id_token().to_string())
            }
            _ => {
                self.notifier.notify(Toast::error(LOGIN_REQUIRED_MESSAGE));
                None
            }
        }
    }
}
