//! 收尾按钮
//!
//! 完成信号出现后，按顺序等待并点击配置的按钮序列。
//! 第一个等不到的按钮会以超时错误终止。

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use tracing::info;

use crate::workflow::element::wait_for_interactable;

/// 解析逗号分隔的按钮选择器列表
pub fn parse_button_selectors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// 按顺序点击收尾按钮
///
/// # 参数
/// - `page`: 浏览器页面对象
/// - `selectors`: 按钮选择器，按点击顺序排列
/// - `wait`: 等待单个按钮可交互的时间
pub async fn click_final_buttons(
    page: &Page,
    selectors: &[String],
    wait: Duration,
) -> Result<()> {
    if selectors.is_empty() {
        return Ok(());
    }

    info!("🏁 点击 {} 个收尾按钮...", selectors.len());

    for selector in selectors {
        let button = wait_for_interactable(page, selector, wait).await?;
        button
            .click()
            .await
            .with_context(|| format!("点击按钮 {} 失败", selector))?;
        info!("✓ 已点击: {}", selector);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_selectors() {
        let selectors = parse_button_selectors("#confirm, #done");
        assert_eq!(selectors, vec!["#confirm".to_string(), "#done".to_string()]);
    }

    #[test]
    fn empty_string_parses_to_no_selectors() {
        assert!(parse_button_selectors("").is_empty());
        assert!(parse_button_selectors(" , ,").is_empty());
    }
}
