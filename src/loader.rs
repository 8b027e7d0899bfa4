//! 宿主数据加载
//! 读取宿主导出的标签页快照、设置与外部决策（JSON）

use std::path::Path;
use serde::Deserialize;
use tracing::debug;

use crate::analysis::Tab;
use crate::config::Settings;
use crate::error::{TabGeniusError, TgResult};
use crate::postprocess::Decisions;

// 快照既可以是标签页数组，也可以是 `{ "tabs": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Bare(Vec<Tab>),
    Wrapped { tabs: Vec<Tab> },
}

/// 宿主数据加载器
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// 加载标签页快照
    pub async fn load_snapshot(path: impl AsRef<Path>) -> TgResult<Vec<Tab>> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TabGeniusError::SnapshotUnavailable(format!("读取 {} 失败：{}", path.display(), e)))?;
        let tabs = Self::parse_snapshot(&text)?;
        debug!("标签页快照加载成功：{}，共{}个", path.display(), tabs.len());
        Ok(tabs)
    }

    pub fn parse_snapshot(text: &str) -> TgResult<Vec<Tab>> {
        let snapshot: SnapshotFile = serde_json::from_str(text)
            .map_err(|e| TabGeniusError::SnapshotUnavailable(format!("快照格式错误：{}", e)))?;
        Ok(match snapshot {
            SnapshotFile::Bare(tabs) | SnapshotFile::Wrapped { tabs } => tabs,
        })
    }

    /// 加载设置，字段缺失或取值非法时回退默认值
    pub async fn load_settings(path: impl AsRef<Path>) -> TgResult<Settings> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TabGeniusError::SettingsUnavailable(format!("读取 {} 失败：{}", path.display(), e)))?;
        let settings: Settings = serde_json::from_str(&text)
            .map_err(|e| TabGeniusError::SettingsUnavailable(format!("设置格式错误：{}", e)))?;
        debug!(
            "设置加载成功：闲置阈值{}小时，自定义分类{}个",
            settings.inactive_hours,
            settings.custom_categories.len()
        );
        Ok(settings)
    }

    /// 加载外部分类决策
    pub async fn load_decisions(path: impl AsRef<Path>) -> TgResult<Decisions> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TabGeniusError::SnapshotUnavailable(format!("读取 {} 失败：{}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| TabGeniusError::SnapshotUnavailable(format!("决策格式错误：{}", e)))
    }
}
