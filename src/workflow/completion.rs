//! 完成等待
//!
//! 固定间隔轮询两个完成来源：工作进程信号和页面上的 DOM 条件。
//! 每个轮询周期先检查信号再检查 DOM，两者同时满足时以工作进程为准。

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::error::AppError;
use crate::worker::signal::CompletionSignal;
use crate::workflow::element::visibility_script;

/// 完成信号的来源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionSource {
    /// 工作进程输出了完成标记
    Process,
    /// 页面上的 DOM 条件满足
    Dom,
}

impl CompletionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionSource::Process => "process",
            CompletionSource::Dom => "dom",
        }
    }
}

/// 页面完成条件
///
/// 配置了完成文本时检查元素文本是否包含该文本，否则只检查元素可见性。
#[derive(Clone, Debug)]
pub enum CompletionProbe {
    /// 元素可见即视为完成
    Visible { selector: String },
    /// 元素文本包含指定内容即视为完成
    TextPresent { selector: String, text: String },
}

impl CompletionProbe {
    /// 根据配置构造条件
    pub fn from_config(selector: &str, completion_text: &str) -> Self {
        if completion_text.is_empty() {
            CompletionProbe::Visible {
                selector: selector.to_string(),
            }
        } else {
            CompletionProbe::TextPresent {
                selector: selector.to_string(),
                text: completion_text.to_string(),
            }
        }
    }

    /// 生成检查条件的 JS
    fn script(&self) -> Result<String> {
        match self {
            CompletionProbe::Visible { selector } => visibility_script(selector),
            CompletionProbe::TextPresent { selector, text } => {
                let selector_json = serde_json::to_string(selector)?;
                let text_json = serde_json::to_string(text)?;
                Ok(format!(
                    r#"
                    (() => {{
                        const el = document.querySelector({selector_json});
                        if (!el) return false;
                        return (el.textContent || '').includes({text_json});
                    }})()
                    "#
                ))
            }
        }
    }

    /// 在页面上评估条件
    pub async fn check(&self, page: &Page) -> Result<bool> {
        let script = self.script()?;
        let value: serde_json::Value = page
            .evaluate(script)
            .await?
            .into_value()
            .context("无法评估完成条件")?;
        Ok(value.as_bool().unwrap_or(false))
    }
}

/// 等待任一完成来源
///
/// 每个轮询周期：信号已设置则立即以 `Process` 返回；
/// 否则评估 DOM 条件，满足则以 `Dom` 返回。
/// 超时前两者都未满足时返回 [`AppError::Timeout`]。
///
/// # 参数
/// - `signal`: 工作进程的完成信号，没有工作进程时为 `None`
/// - `probe`: 每次轮询评估的 DOM 条件
/// - `timeout`: 总超时
/// - `poll_interval`: 轮询间隔
pub async fn wait_for_completion<F, Fut>(
    signal: Option<CompletionSignal>,
    mut probe: F,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<CompletionSource>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    info!("⏳ 等待完成信号 (最多 {} 秒)...", timeout.as_secs());

    let deadline = Instant::now() + timeout;
    loop {
        // 信号优先于 DOM 条件
        if let Some(signal) = &signal {
            if signal.is_set() {
                info!("✅ 工作进程已发出完成信号");
                return Ok(CompletionSource::Process);
            }
        }

        if probe().await? {
            info!("✅ 页面完成条件已满足");
            return Ok(CompletionSource::Dom);
        }

        if Instant::now() >= deadline {
            return Err(AppError::completion_timeout(timeout.as_secs()).into());
        }
        debug!("完成信号未出现，继续等待...");
        sleep(poll_interval).await;
    }
}
