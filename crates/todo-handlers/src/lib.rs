//! ToDo API の Lambda ハンドラー群
//!
//! 作成・一覧・更新・削除の 4 ハンドラーと、単一関数で全ルートを扱うルーターを提供する。
//! ストアやメトリクスクライアントは [`AppState`] としてプロセス起動時に一度だけ組み立て、
//! 各ハンドラーへ明示的に渡す。

pub mod handlers;
pub mod lambda;
pub mod request;
pub mod response;
pub mod router;
pub mod state;

pub use handlers::*;
pub use lambda::Endpoint;
pub use request::*;
pub use response::*;
pub use router::route;
pub use state::AppState;
