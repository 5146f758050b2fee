//! 服务可达性探测
//!
//! 启动浏览器之前先确认目标 URL 能响应，避免对着没启动的服务打开页面。

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// 单次探测请求的超时
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// 两次探测之间的间隔
const PROBE_INTERVAL: Duration = Duration::from_secs(1);

/// 轮询目标 URL 直到响应或超时
///
/// 只探测 http/https，其他协议直接视为可达。
/// 收到任何 HTTP 响应（包括错误状态码）都算可达，只有连接失败才继续等。
pub async fn wait_for_service(url: &str, timeout_secs: u64) -> bool {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return true;
    }

    info!("⏳ 等待目标服务响应: {} (最多 {} 秒)", url, timeout_secs);

    let client = match reqwest::Client::builder().timeout(PROBE_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            debug!("构建 HTTP 客户端失败: {}", e);
            return false;
        }
    };

    let deadline = Instant::now() + Duration::from_secs(timeout_secs);
    loop {
        match client.head(url).send().await {
            Ok(response) => {
                debug!("服务已响应，状态: {}", response.status());
                return true;
            }
            Err(e) => debug!("服务未就绪: {}", e),
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(PROBE_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_http_scheme_is_immediately_available() {
        assert!(wait_for_service("file:///tmp/page.html", 1).await);
        assert!(wait_for_service("about:blank", 1).await);
    }

    #[tokio::test]
    async fn unreachable_service_times_out() {
        // 保留地址，不会有服务响应
        assert!(!wait_for_service("http://192.0.2.1:9/", 1).await);
    }
}
