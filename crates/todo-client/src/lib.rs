//! ToDo API のクライアント
//!
//! HTTP データ層（[`TodoApi`]）、認証ガード（[`TokenGuard`]）、通知（[`Notifier`]）と、
//! 画面に依存しない一覧ビューモデル（[`TodoList`]）を提供する。

pub mod api;
pub mod config;
pub mod errors;
pub mod guard;
pub mod list;
pub mod notify;
pub mod session;

pub use api::*;
pub use config::*;
pub use errors::*;
pub use guard::*;
pub use list::*;
pub use notify::*;
pub use session::*;
