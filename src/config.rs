use std::path::PathBuf;

use crate::cli::Cli;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 工作进程配置 ---
    /// 工作进程命令，为空时不启动工作进程
    pub worker_command: Option<String>,
    /// 工作进程的工作目录
    pub worker_cwd: Option<PathBuf>,
    /// 工作进程输出中表示完成的标记文本
    pub completion_marker: Option<String>,
    /// 工作进程日志文件路径
    pub log_path: Option<PathBuf>,
    // --- 表格配置 ---
    /// 输入表格路径
    pub table_path: PathBuf,
    /// 第一个字段对应的列名
    pub first_column: String,
    /// 第二个字段对应的列名
    pub second_column: String,
    /// 链接分组映射表路径（文件不存在时跳过映射）
    pub link_table_path: Option<PathBuf>,
    /// 映射表中的分组名列
    pub link_name_column: String,
    /// 映射表中的域名列
    pub link_domain_column: String,
    /// 第二列中多个分组名之间的分隔符
    pub link_delimiter: String,
    /// 状态列名
    pub status_column: String,
    /// 写入状态列的值
    pub status_value: String,
    /// 输出表格路径，为空时覆盖输入表格
    pub output_path: Option<PathBuf>,
    // --- 浏览器配置 ---
    /// 目标URL
    pub url: String,
    /// 第一个输入框的CSS选择器
    pub first_field: String,
    /// 第二个输入框的CSS选择器
    pub second_field: String,
    /// 提交元素（发送回车）的CSS选择器
    pub submit_field: String,
    /// 页面上表示完成的元素的CSS选择器
    pub completion_selector: String,
    /// 完成元素中需要出现的文本，为空时只检查可见性
    pub completion_text: String,
    /// 完成后依次点击的按钮选择器，逗号分隔
    pub final_buttons: String,
    /// 等待完成信号的超时（秒）
    pub timeout_secs: u64,
    /// 启动浏览器前等待目标服务响应的时间（秒）
    pub service_wait_secs: u64,
    /// 等待单个元素可交互的时间（秒）
    pub element_wait_secs: u64,
    /// 是否以无头模式运行浏览器
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_command: None,
            worker_cwd: None,
            completion_marker: None,
            log_path: None,
            table_path: PathBuf::from("data/topics.csv"),
            first_column: "Research Topics".to_string(),
            second_column: "Links".to_string(),
            link_table_path: Some(PathBuf::from("data/links.csv")),
            link_name_column: "Link Group Name".to_string(),
            link_domain_column: "Domains".to_string(),
            link_delimiter: ",".to_string(),
            status_column: "Status".to_string(),
            status_value: "Done".to_string(),
            output_path: None,
            url: "http://127.0.0.1:8000/#".to_string(),
            first_field: "[data-testid='first-field']".to_string(),
            second_field: "[data-testid='second-field']".to_string(),
            submit_field: "[data-testid='second-field']".to_string(),
            completion_selector: "[data-testid='status']".to_string(),
            completion_text: String::new(),
            final_buttons: String::new(),
            timeout_secs: 120,
            service_wait_secs: 40,
            element_wait_secs: 10,
            headless: false,
        }
    }
}

impl Config {
    /// 从命令行参数构建配置，未指定的参数使用默认值
    pub fn from_cli(cli: Cli) -> Self {
        let default = Self::default();
        Self {
            worker_command: cli.worker,
            worker_cwd: cli.worker_cwd,
            completion_marker: cli.completion_marker,
            log_path: cli.log_path,
            table_path: cli.table_path.unwrap_or(default.table_path),
            first_column: cli.first_column.unwrap_or(default.first_column),
            second_column: cli.second_column.unwrap_or(default.second_column),
            link_table_path: cli.link_table_path.or(default.link_table_path),
            link_name_column: cli.link_name_column.unwrap_or(default.link_name_column),
            link_domain_column: cli.link_domain_column.unwrap_or(default.link_domain_column),
            link_delimiter: cli.link_delimiter.unwrap_or(default.link_delimiter),
            status_column: cli.status_column.unwrap_or(default.status_column),
            status_value: cli.status_value.unwrap_or(default.status_value),
            output_path: cli.output_path,
            url: cli.url.unwrap_or(default.url),
            first_field: cli.first_field.unwrap_or(default.first_field),
            second_field: cli.second_field.unwrap_or(default.second_field),
            submit_field: cli.submit_field.unwrap_or(default.submit_field),
            completion_selector: cli
                .completion_selector
                .unwrap_or(default.completion_selector),
            completion_text: cli.completion_text.unwrap_or(default.completion_text),
            final_buttons: cli.final_buttons.unwrap_or(default.final_buttons),
            timeout_secs: cli.timeout.unwrap_or(default.timeout_secs),
            service_wait_secs: cli.service_wait.unwrap_or(default.service_wait_secs),
            element_wait_secs: cli.element_wait.unwrap_or(default.element_wait_secs),
            headless: cli.headless,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn default_config_matches_unspecified_cli() {
        let cli = Cli::parse_from(["auto_form_submit"]);
        let config = Config::from_cli(cli);
        let default = Config::default();

        assert_eq!(config.table_path, default.table_path);
        assert_eq!(config.first_column, default.first_column);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.service_wait_secs, 40);
        assert!(!config.headless);
        assert!(config.worker_command.is_none());
    }

    #[test]
    fn cli_args_override_defaults() {
        let cli = Cli::parse_from([
            "auto_form_submit",
            "--worker",
            "python worker.py",
            "--table-path",
            "input.csv",
            "--first-column",
            "Topic",
            "--timeout",
            "30",
            "--headless",
        ]);
        let config = Config::from_cli(cli);

        assert_eq!(config.worker_command.as_deref(), Some("python worker.py"));
        assert_eq!(config.table_path, PathBuf::from("input.csv"));
        assert_eq!(config.first_column, "Topic");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.headless);
    }
}
