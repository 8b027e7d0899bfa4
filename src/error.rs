//! 全局错误类型定义
//! 分类/建议/去重流水线本身不产生错误，仅快照加载与会话存储会失败

use thiserror::Error;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum TabGeniusError {
    // 宿主数据相关错误
    #[error("标签页快照不可用：{0}")]
    SnapshotUnavailable(String),
    #[error("设置不可用：{0}")]
    SettingsUnavailable(String),

    // 会话相关错误
    #[error("会话未找到：{0}")]
    SessionNotFound(String),
    #[error("会话存储失败：{0}")]
    SessionStoreError(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("MessagePack序列化/反序列化失败：{0}")]
    MsgPackError(String),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
}

// 全局Result类型
pub type TgResult<T> = Result<T, TabGeniusError>;
