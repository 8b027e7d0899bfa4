//! 重复标签页检测
//! 以归一化URL为键分组，保持首次出现顺序

use std::collections::HashMap;

use super::model::{DuplicateGroup, Tab, TabSummary};
use crate::utils::UrlNormalizer;

/// 重复检测结果索引
#[derive(Debug, Default)]
pub struct DuplicateIndex<'a> {
    groups: Vec<(String, Vec<&'a Tab>)>,
    positions: HashMap<String, usize>,
}

impl<'a> DuplicateIndex<'a> {
    /// 归一化键所在组的大小（未知键为0）
    pub fn group_size(&self, normalized: &str) -> usize {
        self.positions
            .get(normalized)
            .map(|&pos| self.groups[pos].1.len())
            .unwrap_or(0)
    }

    /// 多余副本总数
    pub fn duplicate_count(&self) -> usize {
        self.groups
            .iter()
            .filter(|(_, tabs)| tabs.len() > 1)
            .map(|(_, tabs)| tabs.len() - 1)
            .sum()
    }

    /// 大小超过1的组
    pub fn groups(&self) -> Vec<DuplicateGroup> {
        self.groups
            .iter()
            .filter(|(_, tabs)| tabs.len() > 1)
            .map(|(url, tabs)| DuplicateGroup {
                normalized_url: url.clone(),
                tab_ids: tabs.iter().map(|t| t.id).collect(),
                count: tabs.len(),
                tabs: tabs
                    .iter()
                    .map(|t| TabSummary {
                        id: t.id,
                        title: t.title.clone(),
                        window_id: t.window_id,
                    })
                    .collect(),
            })
            .collect()
    }
}

/// 重复标签页检测器
pub struct DuplicateDetector;

impl DuplicateDetector {
    /// 按预先计算的归一化键分组
    pub fn index<'a>(keyed: &[(&'a Tab, String)]) -> DuplicateIndex<'a> {
        let mut index = DuplicateIndex::default();
        for (tab, key) in keyed {
            match index.positions.get(key) {
                Some(&pos) => index.groups[pos].1.push(*tab),
                None => {
                    index.positions.insert(key.clone(), index.groups.len());
                    index.groups.push((key.clone(), vec![*tab]));
                }
            }
        }
        index
    }

    /// 直接对标签页列表分组
    pub fn detect(tabs: &[Tab]) -> Vec<DuplicateGroup> {
        let keyed: Vec<(&Tab, String)> = tabs.iter().map(|t| (t, UrlNormalizer::normalize(&t.url))).collect();
        Self::index(&keyed).groups()
    }
}

/// 每组保留第一个，返回其余待关闭的标签页ID
pub fn duplicate_tab_ids_to_close(groups: &[DuplicateGroup]) -> Vec<i64> {
    groups
        .iter()
        .flat_map(|g| g.tab_ids.iter().skip(1).copied())
        .collect()
}
