use anyhow::Result;
use clap::Parser;

use auto_form_submit::utils::logging;
use auto_form_submit::{App, Cli, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_cli(Cli::parse());

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
