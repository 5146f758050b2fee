//! 一次性完成信号
//!
//! 后台读取任务是唯一的写入方，主流程只通过轮询读取。
//! 信号只会从 false 变为 true，一次设置后不再改变。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 一次性完成信号（单调布尔值）
#[derive(Clone, Debug, Default)]
pub struct CompletionSignal {
    flag: Arc<AtomicBool>,
}

impl CompletionSignal {
    /// 创建未设置的信号
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置信号，重复调用无副作用
    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// 信号是否已设置
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
