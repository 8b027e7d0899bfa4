//! 会话模块：保存与恢复标签页会话
pub mod store;

pub use self::store::{default_session_name, session_tabs_from, Session, SessionStore, SessionTab, MAX_SESSIONS};
