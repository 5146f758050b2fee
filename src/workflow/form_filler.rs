//! 表单填写
//!
//! 等待两个输入框可交互，清空后输入值，最后在提交元素上发送回车。

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use tracing::{debug, info};

use crate::workflow::element::wait_for_interactable;

/// 表单元素选择器
#[derive(Clone, Debug)]
pub struct FieldSelectors {
    /// 第一个输入框
    pub first: String,
    /// 第二个输入框
    pub second: String,
    /// 提交元素（接收回车）
    pub submit: String,
}

/// 填写两个字段并提交
///
/// # 参数
/// - `page`: 浏览器页面对象
/// - `selectors`: 表单元素选择器
/// - `first_value`: 第一个字段的值
/// - `second_value`: 第二个字段的值
/// - `wait`: 等待单个元素可交互的时间
pub async fn fill_and_submit(
    page: &Page,
    selectors: &FieldSelectors,
    first_value: &str,
    second_value: &str,
    wait: Duration,
) -> Result<()> {
    fill_field(page, &selectors.first, first_value, wait).await?;
    fill_field(page, &selectors.second, second_value, wait).await?;

    let submit = wait_for_interactable(page, &selectors.submit, wait).await?;
    submit
        .press_key("Enter")
        .await
        .with_context(|| format!("在 {} 上发送回车失败", selectors.submit))?;
    debug!("✓ 已提交");

    Ok(())
}

/// 清空并填写单个输入框
async fn fill_field(page: &Page, selector: &str, value: &str, wait: Duration) -> Result<()> {
    let element = wait_for_interactable(page, selector, wait).await?;

    element
        .click()
        .await
        .with_context(|| format!("点击 {} 失败", selector))?;
    clear_value(page, selector).await?;
    element
        .type_str(value)
        .await
        .with_context(|| format!("向 {} 输入文本失败", selector))?;

    info!("✓ 已填写 {}: {}", selector, preview(value));
    Ok(())
}

/// 清空输入框的当前值
async fn clear_value(page: &Page, selector: &str) -> Result<()> {
    let selector_json = serde_json::to_string(selector)?;
    let script = format!(
        r#"
        (() => {{
            const el = document.querySelector({selector_json});
            if (el) el.value = '';
            return true;
        }})()
        "#
    );
    page.evaluate(script).await?;
    Ok(())
}

/// 截断长文本用于日志显示
fn preview(text: &str) -> String {
    if text.chars().count() > 60 {
        text.chars().take(60).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
