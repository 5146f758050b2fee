//! 工作进程模块
//!
//! 负责启动外部工作进程、转发其输出，并在输出中出现完成标记时
//! 设置一次性的完成信号

pub mod monitor;
pub mod signal;

pub use monitor::WorkerMonitor;
pub use signal::CompletionSignal;
