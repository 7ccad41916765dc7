//! Slack Notifier 主程序入口

use anyhow::{Context, Result};
use clap::Parser;
use slack_notifier::cli::args::{Args, Commands};
use slack_notifier::cli::commands::{
    Command, InitCommand, PublishCommand, ValidateCommand, VersionCommand,
};
use slack_notifier::logging::{LogConfig, LoggingSystem};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_config = LogConfig {
        level: args.resolve_log_level().await,
        json_format: args.json_logs,
    };

    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    debug!("Slack Notifier v{} 启动", slack_notifier::VERSION);

    if let Err(e) = execute_command(&args).await {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 执行CLI命令
async fn execute_command(args: &Args) -> Result<()> {
    let command: &dyn Command = match &args.command {
        Commands::Publish { .. } => &PublishCommand,
        Commands::Init { .. } => &InitCommand,
        Commands::Validate { .. } => &ValidateCommand,
        Commands::Version { .. } => &VersionCommand,
    };

    command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
}
