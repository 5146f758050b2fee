//! 链接分组映射表
//!
//! 从第二张表格加载"分组名 → 域名列表"的只读映射，
//! 分组名经过归一化（去首尾空白、转小写）后作为键。

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::AppError;

/// 归一化分组名：去首尾空白并转小写
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// 链接分组映射
///
/// 构建一次后只读。空的分组名行会被跳过；
/// 域名单元格为空时映射为空字符串（仍视为已映射）。
#[derive(Clone, Debug, Default)]
pub struct LinkMap {
    entries: HashMap<String, String>,
}

impl LinkMap {
    /// 从 CSV 表格构建映射
    ///
    /// # 参数
    /// - `path`: 映射表路径
    /// - `name_column`: 分组名列名
    /// - `domain_column`: 域名列名
    pub fn from_csv(path: &Path, name_column: &str, domain_column: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("无法读取映射表: {}", path.display()))?;

        let headers = reader.headers()?.clone();
        let name_idx = headers
            .iter()
            .position(|h| h == name_column)
            .ok_or_else(|| AppError::missing_column(name_column, path.display().to_string()))?;
        let domain_idx = headers
            .iter()
            .position(|h| h == domain_column)
            .ok_or_else(|| AppError::missing_column(domain_column, path.display().to_string()))?;

        let mut entries = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let raw_name = record.get(name_idx).unwrap_or("");
            if raw_name.trim().is_empty() {
                continue;
            }
            let domain = record.get(domain_idx).unwrap_or("").to_string();
            entries.insert(normalize_key(raw_name), domain);
        }

        info!("✓ 已加载 {} 个链接分组", entries.len());
        debug!("映射表: {}", path.display());

        Ok(Self { entries })
    }

    /// 查找分组名对应的域名，分组名会先归一化
    pub fn resolve(&self, group: &str) -> Option<&str> {
        self.entries.get(&normalize_key(group)).map(String::as_str)
    }

    /// 映射中的分组数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 映射是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
