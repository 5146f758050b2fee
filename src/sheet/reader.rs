//! 行读取模块
//!
//! 从输入表格中读取 (索引, 第一个值, 第二个值) 元组。
//! 提供了链接分组映射时，第二列可以包含用分隔符连接的多个分组名，
//! 每个分组各自产生一行，第二个值替换为映射到的域名。

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::AppError;
use crate::sheet::link_map::LinkMap;

/// 一行输入数据
///
/// `index` 是源表格中的行号（从 0 开始）；链接分组展开出的多行共享同一个 index。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub index: usize,
    pub first: String,
    pub second: String,
}

/// 从表格中读取所有行
///
/// # 参数
/// - `path`: 表格路径
/// - `first_column`: 第一个字段的列名
/// - `second_column`: 第二个字段的列名
/// - `link_map`: 可选的链接分组映射
/// - `delimiter`: 第二列中分组名之间的分隔符
///
/// # 返回
/// 按源表格行序排列的行列表；缺少必需的列时返回配置错误
pub fn read_rows(
    path: &Path,
    first_column: &str,
    second_column: &str,
    link_map: Option<&LinkMap>,
    delimiter: &str,
) -> Result<Vec<Row>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("无法读取表格: {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let first_idx = headers
        .iter()
        .position(|h| h == first_column)
        .ok_or_else(|| AppError::missing_column(first_column, path.display().to_string()))?;
    let second_idx = headers
        .iter()
        .position(|h| h == second_column)
        .ok_or_else(|| AppError::missing_column(second_column, path.display().to_string()))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("表格第 {} 行读取失败", index + 1))?;
        let first = record.get(first_idx).unwrap_or("").to_string();
        let raw_second = record.get(second_idx).unwrap_or("");

        expand_row(&mut rows, index, first, raw_second, link_map, delimiter);
    }

    info!("✓ 从 {} 读取到 {} 行输入", path.display(), rows.len());
    debug!("列: '{}' / '{}'", first_column, second_column);

    Ok(rows)
}

/// 展开单个源行
///
/// 没有映射表时原样产生一行；有映射表时按分隔符拆分第二列，
/// 每个非空分组名产生一行。未映射的分组名原样保留，
/// 拆分后没有任何非空分组时保留原始文本。
fn expand_row(
    rows: &mut Vec<Row>,
    index: usize,
    first: String,
    raw_second: &str,
    link_map: Option<&LinkMap>,
    delimiter: &str,
) {
    let Some(map) = link_map else {
        rows.push(Row {
            index,
            first,
            second: raw_second.to_string(),
        });
        return;
    };

    if raw_second.is_empty() {
        rows.push(Row {
            index,
            first,
            second: String::new(),
        });
        return;
    }

    let groups: Vec<&str> = raw_second
        .split(delimiter)
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .collect();

    if groups.is_empty() {
        rows.push(Row {
            index,
            first,
            second: raw_second.to_string(),
        });
        return;
    }

    for group in groups {
        let second = match map.resolve(group) {
            Some(domain) => domain.to_string(),
            None => group.to_string(),
        };
        rows.push(Row {
            index,
            first: first.clone(),
            second,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(content.as_bytes()).expect("写入失败");
        file
    }

    fn link_map(content: &str) -> LinkMap {
        let file = write_csv(content);
        LinkMap::from_csv(file.path(), "Link Group Name", "Domains").unwrap()
    }

    #[test]
    fn one_row_per_source_row_without_link_map() {
        let file = write_csv("Topic,Links\nAI,a.com\nML,b.com\n");
        let rows = read_rows(file.path(), "Topic", "Links", None, ",").unwrap();

        assert_eq!(
            rows,
            vec![
                Row {
                    index: 0,
                    first: "AI".into(),
                    second: "a.com".into()
                },
                Row {
                    index: 1,
                    first: "ML".into(),
                    second: "b.com".into()
                },
            ]
        );
    }

    #[test]
    fn multi_group_cell_expands_to_one_row_per_group() {
        let file = write_csv("Topic,Links\nAI,\"groupX,groupY\"\n");
        let map = link_map("Link Group Name,Domains\ngroupx,a.com\ngroupy,b.com\n");
        let rows = read_rows(file.path(), "Topic", "Links", Some(&map), ",").unwrap();

        assert_eq!(
            rows,
            vec![
                Row {
                    index: 0,
                    first: "AI".into(),
                    second: "a.com".into()
                },
                Row {
                    index: 0,
                    first: "AI".into(),
                    second: "b.com".into()
                },
            ]
        );
    }

    #[test]
    fn unmapped_group_passes_through_unchanged() {
        let file = write_csv("Topic,Links\nAI,\"groupx,unknown\"\n");
        let map = link_map("Link Group Name,Domains\ngroupx,a.com\n");
        let rows = read_rows(file.path(), "Topic", "Links", Some(&map), ",").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].second, "a.com");
        assert_eq!(rows[1].second, "unknown");
    }

    #[test]
    fn empty_second_cell_yields_empty_value() {
        let file = write_csv("Topic,Links\nAI,\n");
        let map = link_map("Link Group Name,Domains\ngroupx,a.com\n");
        let rows = read_rows(file.path(), "Topic", "Links", Some(&map), ",").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].second, "");
    }

    #[test]
    fn delimiter_only_cell_keeps_raw_text() {
        // 拆分后全是空白时保留原始文本
        let file = write_csv("Topic,Links\nAI,\" , \"\n");
        let map = link_map("Link Group Name,Domains\ngroupx,a.com\n");
        let rows = read_rows(file.path(), "Topic", "Links", Some(&map), ",").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].second, " , ");
    }

    #[test]
    fn group_names_normalize_before_lookup() {
        let file = write_csv("Topic,Links\nAI,\" GroupX , GROUPY\"\n");
        let map = link_map("Link Group Name,Domains\ngroupx,a.com\ngroupy,b.com\n");
        let rows = read_rows(file.path(), "Topic", "Links", Some(&map), ",").unwrap();

        assert_eq!(rows[0].second, "a.com");
        assert_eq!(rows[1].second, "b.com");
    }

    #[test]
    fn missing_required_column_is_config_error() {
        let file = write_csv("Topic,Links\nAI,a.com\n");
        let err = read_rows(file.path(), "Subject", "Links", None, ",").unwrap_err();

        let app_err = err.downcast_ref::<AppError>().expect("应为 AppError");
        assert!(matches!(app_err, AppError::Config(_)));
        assert!(err.to_string().contains("Subject"));
    }
}
