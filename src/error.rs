use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 配置错误（缺少必需的列等）
    Config(ConfigError),
    /// 连接错误（目标服务不可达）
    Connectivity(ConnectivityError),
    /// 超时错误（元素不可交互、完成信号未出现）
    Timeout(TimeoutError),
    /// 工作进程错误
    Process(ProcessError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Connectivity(e) => write!(f, "连接错误: {}", e),
            AppError::Timeout(e) => write!(f, "超时错误: {}", e),
            AppError::Process(e) => write!(f, "工作进程错误: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Connectivity(e) => Some(e),
            AppError::Timeout(e) => Some(e),
            AppError::Process(e) => Some(e),
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 表格中缺少必需的列
    MissingColumn { column: String, path: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingColumn { column, path } => {
                write!(f, "表格 {} 中缺少必需的列 '{}'", path, column)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// 连接错误
#[derive(Debug)]
pub enum ConnectivityError {
    /// 目标服务在等待时间内没有响应
    ServiceUnreachable { url: String, waited_secs: u64 },
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityError::ServiceUnreachable { url, waited_secs } => {
                write!(
                    f,
                    "目标服务 {} 在 {} 秒内没有响应，请先启动 Web 应用或检查 --url",
                    url, waited_secs
                )
            }
        }
    }
}

impl std::error::Error for ConnectivityError {}

/// 超时错误
#[derive(Debug)]
pub enum TimeoutError {
    /// 元素在等待时间内没有变为可交互
    ElementNotInteractable { selector: String, waited_secs: u64 },
    /// 完成信号在等待时间内没有出现
    CompletionNotObserved { waited_secs: u64 },
}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutError::ElementNotInteractable {
                selector,
                waited_secs,
            } => {
                write!(f, "元素 '{}' 在 {} 秒内未变为可交互", selector, waited_secs)
            }
            TimeoutError::CompletionNotObserved { waited_secs } => {
                write!(f, "{} 秒内未观察到完成信号（DOM 或工作进程）", waited_secs)
            }
        }
    }
}

impl std::error::Error for TimeoutError {}

/// 工作进程错误
#[derive(Debug)]
pub enum ProcessError {
    /// 工作进程启动失败
    SpawnFailed {
        command: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::SpawnFailed { command, source } => {
                write!(f, "工作进程启动失败 ({}): {}", command, source)
            }
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::SpawnFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建缺少列错误
    pub fn missing_column(column: impl Into<String>, path: impl Into<String>) -> Self {
        AppError::Config(ConfigError::MissingColumn {
            column: column.into(),
            path: path.into(),
        })
    }

    /// 创建服务不可达错误
    pub fn service_unreachable(url: impl Into<String>, waited_secs: u64) -> Self {
        AppError::Connectivity(ConnectivityError::ServiceUnreachable {
            url: url.into(),
            waited_secs,
        })
    }

    /// 创建元素等待超时错误
    pub fn element_timeout(selector: impl Into<String>, waited_secs: u64) -> Self {
        AppError::Timeout(TimeoutError::ElementNotInteractable {
            selector: selector.into(),
            waited_secs,
        })
    }

    /// 创建完成等待超时错误
    pub fn completion_timeout(waited_secs: u64) -> Self {
        AppError::Timeout(TimeoutError::CompletionNotObserved { waited_secs })
    }

    /// 创建工作进程启动失败错误
    pub fn process_spawn_failed(
        command: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Process(ProcessError::SpawnFailed {
            command: command.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
