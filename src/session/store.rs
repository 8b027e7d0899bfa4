//! 会话存储
//! 会话列表以 MessagePack 整体读写到本地文件，最新的排在最前

use std::path::PathBuf;
use chrono::{DateTime, SecondsFormat, Utc};
use rmp_serde::{from_slice, Serializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::AnalysisResult;
use crate::error::{TabGeniusError, TgResult};

/// 最多保留的会话数
pub const MAX_SESSIONS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTab {
    pub url: String,
    pub title: String,
}

/// 已保存的会话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    pub tabs: Vec<SessionTab>,
    pub created_at: String,
}

/// 按分类桶顺序收集分析结果中的标签页
pub fn session_tabs_from(result: &AnalysisResult) -> Vec<SessionTab> {
    result
        .records()
        .map(|r| SessionTab {
            url: r.url.clone(),
            title: r.title.clone(),
        })
        .collect()
}

/// 默认会话名：`Session <YYYY-MM-DD>`
pub fn default_session_name(now: DateTime<Utc>) -> String {
    format!("Session {}", now.format("%Y-%m-%d"))
}

/// 本地会话存储
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 读取全部会话；存储文件不存在时为空列表
    pub async fn list(&self) -> TgResult<Vec<Session>> {
        if !tokio::fs::try_exists(&self.path).await? {
            debug!("会话文件不存在：{}", self.path.display());
            return Ok(Vec::new());
        }
        let data = tokio::fs::read(&self.path).await?;
        let sessions: Vec<Session> = from_slice(&data)
            .map_err(|e| TabGeniusError::MsgPackError(format!("反序列化失败：{}", e)))?;
        debug!("会话文件读取成功，会话数：{}", sessions.len());
        Ok(sessions)
    }

    /// 保存新会话（插入最前，超出上限的旧会话被丢弃）
    pub async fn save(&self, name: Option<&str>, tabs: Vec<SessionTab>, now: DateTime<Utc>) -> TgResult<Session> {
        let mut sessions = self.list().await?;

        let mut stamp = now.timestamp_millis();
        while sessions.iter().any(|s| s.id == format!("session_{}", stamp)) {
            stamp += 1;
        }

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_session_name(now));

        let session = Session {
            id: format!("session_{}", stamp),
            name,
            tabs,
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        sessions.insert(0, session.clone());
        sessions.truncate(MAX_SESSIONS);
        self.write_all(&sessions).await?;

        info!("会话已保存：{}（{}，{}个标签页）", session.name, session.id, session.tabs.len());
        Ok(session)
    }

    /// 按ID查找会话
    pub async fn find(&self, id: &str) -> TgResult<Session> {
        self.list()
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| TabGeniusError::SessionNotFound(id.to_string()))
    }

    /// 恢复会话：返回需要由宿主重新打开的标签页
    pub async fn restore(&self, id: &str) -> TgResult<Vec<SessionTab>> {
        let session = self.find(id).await?;
        debug!("恢复会话 {}，标签页数：{}", session.id, session.tabs.len());
        Ok(session.tabs)
    }

    /// 删除会话，返回是否确有删除
    pub async fn delete(&self, id: &str) -> TgResult<bool> {
        let mut sessions = self.list().await?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Ok(false);
        }
        self.write_all(&sessions).await?;
        info!("会话已删除：{}", id);
        Ok(true)
    }

    async fn write_all(&self, sessions: &[Session]) -> TgResult<()> {
        let mut data = Vec::new();
        sessions
            .serialize(&mut Serializer::new(&mut data))
            .map_err(|e| TabGeniusError::MsgPackError(format!("序列化失败：{}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TabGeniusError::SessionStoreError(format!("创建目录失败：{}", e)))?;
        }
        tokio::fs::write(&self.path, data)
            .await
            .map_err(|e| TabGeniusError::SessionStoreError(format!("写入 {} 失败：{}", self.path.display(), e)))?;
        Ok(())
    }
}
