//! 元素等待
//!
//! 轮询等待 CSS 选择器对应的元素出现并可见，超时返回超时错误。

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::{Element, Page};
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::AppError;

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 生成检查元素可见性的 JS
///
/// 选择器通过 JSON 转义嵌入，避免引号问题。
pub fn visibility_script(selector: &str) -> Result<String> {
    let selector_json = serde_json::to_string(selector)?;
    Ok(format!(
        r#"
        (() => {{
            const el = document.querySelector({selector_json});
            if (!el) return false;
            const style = window.getComputedStyle(el);
            if (style.display === 'none' || style.visibility === 'hidden') return false;
            return el.getClientRects().length > 0;
        }})()
        "#
    ))
}

/// 检查元素当前是否可见
pub async fn is_visible(page: &Page, selector: &str) -> Result<bool> {
    let script = visibility_script(selector)?;
    let value: serde_json::Value = page
        .evaluate(script)
        .await?
        .into_value()
        .context("无法读取元素可见性")?;
    Ok(value.as_bool().unwrap_or(false))
}

/// 等待元素出现并可见
///
/// # 参数
/// - `page`: 浏览器页面对象
/// - `selector`: CSS 选择器
/// - `timeout`: 最长等待时间
///
/// # 返回
/// 返回找到的元素；超时返回 [`AppError::Timeout`]
pub async fn wait_for_interactable(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> Result<Element> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(element) = page.find_element(selector).await {
            if is_visible(page, selector).await.unwrap_or(false) {
                debug!("✓ 元素可交互: {}", selector);
                return Ok(element);
            }
        }
        if Instant::now() >= deadline {
            return Err(AppError::element_timeout(selector, timeout.as_secs()).into());
        }
        sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_script_escapes_selector_quotes() {
        let script = visibility_script("[data-testid='status']").unwrap();
        assert!(script.contains(r#""[data-testid='status']""#));

        let script = visibility_script(r#"input[name="q"]"#).unwrap();
        assert!(script.contains(r#"\"q\""#));
    }
}
