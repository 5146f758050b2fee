//! 流程模块
//!
//! 定义一次运行中的各个浏览器操作步骤：
//! 等待元素、填表提交、等待完成信号、点击收尾按钮

pub mod completion;
pub mod element;
pub mod finisher;
pub mod form_filler;

pub use completion::{wait_for_completion, CompletionProbe, CompletionSource};
pub use form_filler::FieldSelectors;
