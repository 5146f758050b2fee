//! 命令行参数定义
//!
//! 所有参数都有默认值（见 [`crate::config::Config`] 的 `Default` 实现），
//! 只需要指定与默认值不同的部分。

use clap::Parser;
use std::path::PathBuf;

/// 自动化 Web 表单提交，同时监控一个工作进程的输出
#[derive(Parser, Debug)]
#[command(name = "auto_form_submit", version)]
pub struct Cli {
    /// 工作进程命令，省略时不启动工作进程
    #[arg(long)]
    pub worker: Option<String>,

    /// 工作进程的工作目录（当工作进程位于其他文件夹时使用）
    #[arg(long)]
    pub worker_cwd: Option<PathBuf>,

    /// 工作进程输出中表示完成的标记文本，仅在指定 --worker 时生效
    #[arg(long)]
    pub completion_marker: Option<String>,

    /// 工作进程日志文件路径
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// 输入表格（CSV）路径
    #[arg(long)]
    pub table_path: Option<PathBuf>,

    /// 第一个字段对应的列名
    #[arg(long)]
    pub first_column: Option<String>,

    /// 第二个字段（或链接分组名）对应的列名
    #[arg(long)]
    pub second_column: Option<String>,

    /// 链接分组映射表（CSV）路径
    #[arg(long)]
    pub link_table_path: Option<PathBuf>,

    /// 映射表中的分组名列
    #[arg(long)]
    pub link_name_column: Option<String>,

    /// 映射表中的域名列
    #[arg(long)]
    pub link_domain_column: Option<String>,

    /// 第二列中多个分组名之间的分隔符
    #[arg(long)]
    pub link_delimiter: Option<String>,

    /// 处理完成后写入的状态列名
    #[arg(long)]
    pub status_column: Option<String>,

    /// 写入状态列的值
    #[arg(long)]
    pub status_value: Option<String>,

    /// 输出表格路径，省略时覆盖输入表格
    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// 浏览器打开的URL
    #[arg(long)]
    pub url: Option<String>,

    /// 第一个输入框的CSS选择器
    #[arg(long)]
    pub first_field: Option<String>,

    /// 第二个输入框的CSS选择器
    #[arg(long)]
    pub second_field: Option<String>,

    /// 提交元素（发送回车）的CSS选择器
    #[arg(long)]
    pub submit_field: Option<String>,

    /// 页面上表示完成的元素的CSS选择器
    #[arg(long)]
    pub completion_selector: Option<String>,

    /// 完成元素中需要出现的文本，省略时只检查元素可见性
    #[arg(long)]
    pub completion_text: Option<String>,

    /// 完成后依次点击的按钮选择器，逗号分隔
    #[arg(long)]
    pub final_buttons: Option<String>,

    /// 等待完成信号的超时（秒）
    #[arg(long)]
    pub timeout: Option<u64>,

    /// 启动浏览器前等待目标服务响应的时间（秒）
    #[arg(long)]
    pub service_wait: Option<u64>,

    /// 等待单个元素可交互的时间（秒）
    #[arg(long)]
    pub element_wait: Option<u64>,

    /// 以无头模式运行浏览器
    #[arg(long)]
    pub headless: bool,
}
