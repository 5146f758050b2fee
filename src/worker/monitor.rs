//! 工作进程监控
//!
//! 通过 `sh -c` 启动工作进程，后台任务逐行读取 stdout/stderr：
//! 每行转发到日志、可选地写入日志文件，
//! 第一次出现完成标记时设置完成信号。

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::worker::signal::CompletionSignal;

/// 进程终止后的等待时间
const SHUTDOWN_WAIT: Duration = Duration::from_secs(5);
/// 读取任务的结束宽限时间
const READER_JOIN_WAIT: Duration = Duration::from_secs(1);

/// 工作进程监控器
///
/// 持有进程句柄和后台读取任务，进程在 [`WorkerMonitor::shutdown`]
/// 中被终止并等待，无论运行成功与否都应调用。
pub struct WorkerMonitor {
    child: Child,
    signal: CompletionSignal,
    reader: JoinHandle<()>,
    command: String,
}

impl WorkerMonitor {
    /// 启动工作进程并开始读取其输出
    ///
    /// # 参数
    /// - `command`: shell 命令
    /// - `marker`: 输出中表示完成的标记文本
    /// - `log_path`: 可选的日志文件路径
    /// - `cwd`: 可选的工作目录
    pub async fn launch(
        command: &str,
        marker: Option<String>,
        log_path: Option<PathBuf>,
        cwd: Option<PathBuf>,
    ) -> Result<Self> {
        info!("🚀 启动工作进程: {}", command);
        if let Some(dir) = &cwd {
            debug!("工作目录: {}", dir.display());
        }

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| crate::error::AppError::process_spawn_failed(command, e))?;

        let stdout = child
            .stdout
            .take()
            .context("无法获取工作进程的 stdout")?;
        let stderr = child
            .stderr
            .take()
            .context("无法获取工作进程的 stderr")?;

        let signal = CompletionSignal::new();
        let reader = tokio::spawn(stream_output(
            BufReader::new(stdout),
            BufReader::new(stderr),
            marker,
            log_path,
            signal.clone(),
        ));

        Ok(Self {
            child,
            signal,
            reader,
            command: command.to_string(),
        })
    }

    /// 获取完成信号的句柄
    pub fn signal(&self) -> CompletionSignal {
        self.signal.clone()
    }

    /// 终止进程并回收读取任务
    ///
    /// 终止后最多等待 5 秒，超时忽略；读取任务再给 1 秒宽限。
    pub async fn shutdown(mut self) {
        info!("🛑 终止工作进程: {}", self.command);

        if let Err(e) = self.child.start_kill() {
            warn!("⚠️ 终止工作进程失败: {}", e);
        }
        if tokio::time::timeout(SHUTDOWN_WAIT, self.child.wait())
            .await
            .is_err()
        {
            warn!("⚠️ 等待工作进程退出超时，忽略");
        }
        if tokio::time::timeout(READER_JOIN_WAIT, &mut self.reader)
            .await
            .is_err()
        {
            self.reader.abort();
        }
    }
}

/// 逐行读取进程输出直到两个流都关闭
///
/// 每行转发到日志；提供了日志文件时追加写入；
/// 第一次匹配到标记文本时设置完成信号。
async fn stream_output(
    stdout: BufReader<tokio::process::ChildStdout>,
    stderr: BufReader<tokio::process::ChildStderr>,
    marker: Option<String>,
    log_path: Option<PathBuf>,
    signal: CompletionSignal,
) {
    let mut log_file = open_log_file(log_path.as_deref()).await;
    let mut out_lines = stdout.lines();
    let mut err_lines = stderr.lines();
    let mut out_done = false;
    let mut err_done = false;

    while !(out_done && err_done) {
        let line = tokio::select! {
            line = out_lines.next_line(), if !out_done => {
                match line {
                    Ok(Some(l)) => Some(l),
                    _ => {
                        out_done = true;
                        None
                    }
                }
            }
            line = err_lines.next_line(), if !err_done => {
                match line {
                    Ok(Some(l)) => Some(l),
                    _ => {
                        err_done = true;
                        None
                    }
                }
            }
        };

        let Some(line) = line else { continue };

        info!("[worker] {}", line);

        if let Some(file) = log_file.as_mut() {
            if file.write_all(line.as_bytes()).await.is_ok() {
                let _ = file.write_all(b"\n").await;
            }
        }

        if let Some(marker) = &marker {
            if !signal.is_set() && line.contains(marker) {
                signal.set();
                info!("✅ 检测到完成标记: {}", marker);
            }
        }
    }

    debug!("工作进程输出流已关闭");
}

/// 创建日志文件并写入带时间戳的文件头
///
/// 创建失败只记录警告，不影响主流程。
async fn open_log_file(log_path: Option<&Path>) -> Option<tokio::fs::File> {
    let path = log_path?;

    let header = format!(
        "{}\n工作进程日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );

    match tokio::fs::File::create(path).await {
        Ok(mut file) => {
            if let Err(e) = file.write_all(header.as_bytes()).await {
                warn!("⚠️ 写入日志文件头失败: {}", e);
            }
            Some(file)
        }
        Err(e) => {
            warn!("⚠️ 无法创建日志文件 {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    /// 轮询等待信号被设置
    async fn wait_until_set(signal: &CompletionSignal, budget: Duration) -> bool {
        let deadline = Instant::now() + budget;
        while Instant::now() < deadline {
            if signal.is_set() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        signal.is_set()
    }

    #[tokio::test]
    async fn marker_in_output_sets_signal() {
        let monitor = WorkerMonitor::launch(
            "printf 'step one\\nReport written to outputs/\\n'",
            Some("Report written to outputs/".to_string()),
            None,
            None,
        )
        .await
        .expect("启动失败");

        let signal = monitor.signal();
        assert!(wait_until_set(&signal, Duration::from_secs(5)).await);

        monitor.shutdown().await;
        // shutdown 之后信号保持已设置
        assert!(signal.is_set());
    }

    #[tokio::test]
    async fn marker_on_stderr_also_sets_signal() {
        let monitor = WorkerMonitor::launch(
            "echo 'DONE' 1>&2",
            Some("DONE".to_string()),
            None,
            None,
        )
        .await
        .expect("启动失败");

        let signal = monitor.signal();
        assert!(wait_until_set(&signal, Duration::from_secs(5)).await);
        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn no_marker_leaves_signal_unset() {
        let monitor = WorkerMonitor::launch("echo 'hello'", None, None, None)
            .await
            .expect("启动失败");

        let signal = monitor.signal();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!signal.is_set());
        monitor.shutdown().await;
        assert!(!signal.is_set());
    }

    #[tokio::test]
    async fn output_is_written_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("worker.log");

        let monitor = WorkerMonitor::launch(
            "printf 'line-a\\nline-b\\n'",
            None,
            Some(log_path.clone()),
            None,
        )
        .await
        .expect("启动失败");

        tokio::time::sleep(Duration::from_millis(300)).await;
        monitor.shutdown().await;

        let content = tokio::fs::read_to_string(&log_path).await.expect("读取日志失败");
        assert!(content.contains("工作进程日志"));
        assert!(content.contains("line-a"));
        assert!(content.contains("line-b"));
    }

    #[tokio::test]
    async fn spawn_failure_is_process_error() {
        let err = WorkerMonitor::launch(
            "echo hi",
            None,
            None,
            Some(PathBuf::from("/nonexistent/dir/for/sure")),
        )
        .await
        .err()
        .expect("应该启动失败");

        let app_err = err
            .downcast_ref::<crate::error::AppError>()
            .expect("应为 AppError");
        assert!(matches!(app_err, crate::error::AppError::Process(_)));
    }
}
