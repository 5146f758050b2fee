//! 状态写回模块
//!
//! 重新读取输入表格，在指定行写入状态值，写到输出路径（或覆盖输入）。

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

/// 将状态值写入指定行
///
/// 状态列不存在时自动创建。索引集合为空时不做任何事。
/// 同样的参数写两次得到同样的结果（幂等）。
///
/// # 参数
/// - `table_path`: 输入表格路径
/// - `indices`: 需要标记的行索引（源表格行号）
/// - `status_column`: 状态列名
/// - `status_value`: 写入的状态值
/// - `output_path`: 输出路径，为空时覆盖输入表格
pub fn write_status(
    table_path: &Path,
    indices: &BTreeSet<usize>,
    status_column: &str,
    status_value: &str,
    output_path: Option<&Path>,
) -> Result<()> {
    if indices.is_empty() {
        info!("没有已处理的行，跳过状态写回");
        return Ok(());
    }

    let mut reader = csv::Reader::from_path(table_path)
        .with_context(|| format!("无法读取表格: {}", table_path.display()))?;

    let mut headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let status_idx = match headers.iter().position(|h| h == status_column) {
        Some(idx) => idx,
        None => {
            headers.push(status_column.to_string());
            headers.len() - 1
        }
    };

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(String::from).collect();
        // 补齐到表头长度（新建状态列时旧行缺一列）
        while row.len() < headers.len() {
            row.push(String::new());
        }
        rows.push(row);
    }
    drop(reader);

    for &index in indices {
        match rows.get_mut(index) {
            Some(row) => row[status_idx] = status_value.to_string(),
            None => warn!("⚠️ 行索引 {} 超出表格范围，跳过", index),
        }
    }

    let target = output_path.unwrap_or(table_path);
    let mut writer = csv::Writer::from_path(target)
        .with_context(|| format!("无法写入表格: {}", target.display()))?;
    writer.write_record(&headers)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(
        "✓ 已将状态 '{}' 写入 {} 行，输出: {}",
        status_value,
        indices.len(),
        target.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_table(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).expect("创建表格失败");
        file.write_all(content.as_bytes()).expect("写入失败");
        path
    }

    #[test]
    fn creates_status_column_when_absent() {
        let dir = tempdir().unwrap();
        let table = write_table(dir.path(), "topics.csv", "Topic,Links\nAI,a.com\nML,b.com\n");
        let indices: BTreeSet<usize> = [0].into_iter().collect();

        write_status(&table, &indices, "Status", "Done", None).unwrap();

        let content = fs::read_to_string(&table).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Topic,Links,Status"));
        assert_eq!(lines.next(), Some("AI,a.com,Done"));
        assert_eq!(lines.next(), Some("ML,b.com,"));
    }

    #[test]
    fn updates_existing_status_column() {
        let dir = tempdir().unwrap();
        let table = write_table(
            dir.path(),
            "topics.csv",
            "Topic,Status,Links\nAI,,a.com\nML,Old,b.com\n",
        );
        let indices: BTreeSet<usize> = [1].into_iter().collect();

        write_status(&table, &indices, "Status", "Done", None).unwrap();

        let content = fs::read_to_string(&table).unwrap();
        assert!(content.contains("AI,,a.com"));
        assert!(content.contains("ML,Done,b.com"));
    }

    #[test]
    fn writing_twice_is_idempotent() {
        let dir = tempdir().unwrap();
        let table = write_table(dir.path(), "topics.csv", "Topic,Links\nAI,a.com\nML,b.com\n");
        let indices: BTreeSet<usize> = [0, 1].into_iter().collect();

        write_status(&table, &indices, "Status", "Done", None).unwrap();
        let first_pass = fs::read_to_string(&table).unwrap();

        write_status(&table, &indices, "Status", "Done", None).unwrap();
        let second_pass = fs::read_to_string(&table).unwrap();

        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn empty_index_set_is_noop() {
        let dir = tempdir().unwrap();
        let table = write_table(dir.path(), "topics.csv", "Topic,Links\nAI,a.com\n");
        let output = dir.path().join("out.csv");
        let indices = BTreeSet::new();

        write_status(&table, &indices, "Status", "Done", Some(&output)).unwrap();

        // 不应该生成输出文件，输入也保持原样
        assert!(!output.exists());
        let content = fs::read_to_string(&table).unwrap();
        assert_eq!(content, "Topic,Links\nAI,a.com\n");
    }

    #[test]
    fn output_path_leaves_input_untouched() {
        let dir = tempdir().unwrap();
        let table = write_table(dir.path(), "topics.csv", "Topic,Links\nAI,a.com\n");
        let output = dir.path().join("out.csv");
        let indices: BTreeSet<usize> = [0].into_iter().collect();

        write_status(&table, &indices, "Status", "Done", Some(&output)).unwrap();

        let input_content = fs::read_to_string(&table).unwrap();
        assert_eq!(input_content, "Topic,Links\nAI,a.com\n");
        let output_content = fs::read_to_string(&output).unwrap();
        assert!(output_content.contains("AI,a.com,Done"));
    }

    #[test]
    fn out_of_range_index_is_skipped() {
        let dir = tempdir().unwrap();
        let table = write_table(dir.path(), "topics.csv", "Topic,Links\nAI,a.com\n");
        let indices: BTreeSet<usize> = [0, 7].into_iter().collect();

        write_status(&table, &indices, "Status", "Done", None).unwrap();

        let content = fs::read_to_string(&table).unwrap();
        assert!(content.contains("AI,a.com,Done"));
    }
}
