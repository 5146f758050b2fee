use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 启动浏览器并导航到指定 URL
///
/// # 参数
/// - `url`: 目标 URL
/// - `headless`: 是否以无头模式运行
pub async fn launch_browser(url: &str, headless: bool) -> Result<(Browser, Page)> {
    info!("🚀 启动浏览器...");
    debug!("目标 URL: {}, 无头模式: {}", url, headless);

    let mut builder = BrowserConfig::builder().window_size(1400, 900).args(vec![
        "--disable-gpu",
        "--no-sandbox",
        "--disable-dev-shm-usage",
    ]);
    builder = if headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    let config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        anyhow::anyhow!("配置浏览器失败: {}", e)
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        anyhow::anyhow!("启动浏览器失败: {}", e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    // 创建新页面并导航
    let page = browser.new_page(url).await.map_err(|e| {
        error!("打开 {} 失败: {}", url, e);
        anyhow::anyhow!("打开 {} 失败，请确认目标服务正在运行或提供可达的 --url: {}", url, e)
    })?;

    info!("✅ 浏览器已导航到: {}", url);

    Ok((browser, page))
}
