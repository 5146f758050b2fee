use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Page;
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::error::AppError;
use crate::sheet::{self, LinkMap, Row};
use crate::worker::{CompletionSignal, WorkerMonitor};
use crate::workflow::{
    completion, finisher, form_filler, CompletionProbe, CompletionSource, FieldSelectors,
};

/// 完成等待的轮询间隔
const COMPLETION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// 应用主结构
///
/// `initialize` 在任何浏览器或工作进程动作之前完成表格校验，
/// 缺少必需的列会在这里直接失败。
pub struct App {
    config: Config,
    rows: Vec<Row>,
}

impl App {
    /// 初始化应用：加载映射表并读取所有输入行
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let link_map = load_link_map(&config)?;
        let rows = sheet::reader::read_rows(
            &config.table_path,
            &config.first_column,
            &config.second_column,
            link_map.as_ref(),
            &config.link_delimiter,
        )?;

        if rows.is_empty() {
            warn!("⚠️ 输入表格中没有任何行");
        }

        Ok(Self { config, rows })
    }

    /// 运行应用主逻辑
    ///
    /// 无论成功与否，启动过的工作进程都会在返回前被终止。
    pub async fn run(self) -> Result<()> {
        let mut worker = None;
        if let Some(command) = &self.config.worker_command {
            worker = Some(
                WorkerMonitor::launch(
                    command,
                    self.config.completion_marker.clone(),
                    self.config.log_path.clone(),
                    self.config.worker_cwd.clone(),
                )
                .await?,
            );
        }

        let result = self.drive(worker.as_ref().map(WorkerMonitor::signal)).await;

        if let Some(worker) = worker {
            worker.shutdown().await;
        }

        result
    }

    /// 探测服务、启动浏览器并执行提交流程
    async fn drive(&self, signal: Option<CompletionSignal>) -> Result<()> {
        if !browser::wait_for_service(&self.config.url, self.config.service_wait_secs).await {
            return Err(AppError::service_unreachable(
                &self.config.url,
                self.config.service_wait_secs,
            )
            .into());
        }

        let (mut browser, page) =
            browser::launch_browser(&self.config.url, self.config.headless).await?;

        let result = self.submit_and_finish(&page, signal).await;

        if let Err(e) = browser.close().await {
            warn!("⚠️ 关闭浏览器失败: {}", e);
        }

        result
    }

    /// 提交所有行、等待完成、点击收尾按钮并写回状态
    async fn submit_and_finish(
        &self,
        page: &Page,
        signal: Option<CompletionSignal>,
    ) -> Result<()> {
        let element_wait = Duration::from_secs(self.config.element_wait_secs);
        let selectors = FieldSelectors {
            first: self.config.first_field.clone(),
            second: self.config.second_field.clone(),
            submit: self.config.submit_field.clone(),
        };

        let mut processed: BTreeSet<usize> = BTreeSet::new();
        for row in &self.rows {
            info!(
                "[行 {}] 📝 提交: {} | {}",
                row.index + 1,
                row.first,
                row.second
            );
            form_filler::fill_and_submit(page, &selectors, &row.first, &row.second, element_wait)
                .await?;
            processed.insert(row.index);
        }
        info!("✓ 共提交 {} 次，覆盖 {} 个源行", self.rows.len(), processed.len());

        let probe = CompletionProbe::from_config(
            &self.config.completion_selector,
            &self.config.completion_text,
        );
        let probe_page = page.clone();
        let source = completion::wait_for_completion(
            signal,
            move || {
                let probe = probe.clone();
                let page = probe_page.clone();
                async move { probe.check(&page).await }
            },
            Duration::from_secs(self.config.timeout_secs),
            COMPLETION_POLL_INTERVAL,
        )
        .await?;
        log_completion(source);

        let buttons = finisher::parse_button_selectors(&self.config.final_buttons);
        finisher::click_final_buttons(page, &buttons, element_wait).await?;

        sheet::writer::write_status(
            &self.config.table_path,
            &processed,
            &self.config.status_column,
            &self.config.status_value,
            self.config.output_path.as_deref(),
        )?;

        info!("✅ 流程处理完成");
        Ok(())
    }
}

/// 加载链接分组映射表
///
/// 配置了路径但文件不存在时跳过映射（这是预期情况，不算错误）。
fn load_link_map(config: &Config) -> Result<Option<LinkMap>> {
    let Some(path) = &config.link_table_path else {
        return Ok(None);
    };

    if !path.exists() {
        info!("映射表 {} 不存在，跳过链接分组展开", path.display());
        return Ok(None);
    }

    let map = LinkMap::from_csv(path, &config.link_name_column, &config.link_domain_column)?;
    Ok(Some(map))
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - Web 表单自动提交");
    info!("📄 输入表格: {}", config.table_path.display());
    info!("🌐 目标 URL: {}", config.url);
    match &config.worker_command {
        Some(command) => info!("⚙️ 工作进程: {}", command),
        None => info!("⚙️ 未配置工作进程"),
    }
    info!("{}", "=".repeat(60));
}

fn log_completion(source: CompletionSource) {
    info!("{}", "─".repeat(60));
    info!("✅ 收到完成信号，来源: {}", source.as_str());
    info!("{}", "─".repeat(60));
}
