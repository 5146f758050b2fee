//! # Auto Form Submit
//!
//! 一个用于自动化 Web 表单提交的 Rust 应用程序：
//! 从表格中读取每行的两个字段值，驱动浏览器填入表单并提交，
//! 同时可选地监控一个工作进程的输出，
//! 在页面完成条件或工作进程完成标记出现后点击收尾按钮，
//! 最后把状态列写回表格。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Sheet）
//! - `sheet/` - 表格读取、链接分组映射、状态写回
//!
//! ### ② 资源层（Browser / Worker）
//! - `browser/` - 浏览器启动和服务可达性探测
//! - `worker/` - 工作进程的启动、输出转发和一次性完成信号
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 元素等待、表单填写、完成等待、收尾按钮
//!
//! ### ④ 编排层（App）
//! - `app` - 串联全部步骤，负责资源的兜底清理
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod sheet;
pub mod utils;
pub mod worker;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use cli::Cli;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use sheet::{LinkMap, Row};
pub use worker::{CompletionSignal, WorkerMonitor};
pub use workflow::{CompletionProbe, CompletionSource};
