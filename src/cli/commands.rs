//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, OutputFormat};
use crate::config::{ConfigLoader, TomlConfigLoader};
use crate::error::Result;
use crate::notification::{SlackService, StandardSlackService};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// 示例配置模板
const SAMPLE_CONFIG: &str = include_str!("../../config/sample_config.toml");

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 发布命令
pub struct PublishCommand;

#[async_trait]
impl Command for PublishCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Publish {
            message,
            color,
            room,
        } = &args.command
        {
            self.publish(args, message, color, room.as_deref()).await
        } else {
            Ok(())
        }
    }
}

impl PublishCommand {
    /// 加载配置并发布消息
    async fn publish(
        &self,
        args: &Args,
        message: &str,
        color: &str,
        room: Option<&str>,
    ) -> Result<()> {
        let loader = TomlConfigLoader::new(true);
        let mut config = loader.load_from_file(args.get_config_path()).await?;

        if let Some(room) = room {
            config.slack.room = room.to_string();
        }

        let service = StandardSlackService::from_config(&config)?;
        info!(
            "发布消息到 {} 个房间: {:?}",
            service.room_ids().len(),
            service.room_ids()
        );

        if service.publish(message, color).await {
            println!("✅ 消息已发送到 {} 个房间", service.room_ids().len());
            Ok(())
        } else {
            Err(anyhow::anyhow!("部分房间消息发送失败，详情见日志").into())
        }
    }
}

/// 初始化命令
pub struct InitCommand;

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Init { config_path, force } = &args.command {
            self.create_config_file(config_path, *force).await
        } else {
            Ok(())
        }
    }
}

impl InitCommand {
    /// 创建配置文件
    async fn create_config_file(&self, config_path: &Path, force: bool) -> Result<()> {
        if config_path.exists() && !force {
            eprintln!("配置文件已存在: {}", config_path.display());
            eprintln!("使用 --force 参数覆盖现有文件");
            return Ok(());
        }

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = format!(
            "# 生成时间: {}\n{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            SAMPLE_CONFIG
        );
        tokio::fs::write(config_path, content).await?;

        println!("配置文件已创建: {}", config_path.display());
        println!("请编辑配置文件以填写团队域名、令牌和房间");

        Ok(())
    }
}

/// 验证命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Validate {
            config_path,
            verbose,
        } = &args.command
        {
            let config_file = config_path
                .clone()
                .unwrap_or_else(|| args.get_config_path());

            self.validate_config_file(&config_file, *verbose).await
        } else {
            Ok(())
        }
    }
}

impl ValidateCommand {
    /// 验证配置文件
    async fn validate_config_file(&self, config_path: &Path, verbose: bool) -> Result<()> {
        println!("验证配置文件: {}", config_path.display());

        let loader = TomlConfigLoader::new(true);
        let config = loader.load_from_file(config_path).await?;
        let rooms = config.slack.room_ids();

        if verbose {
            println!("配置验证通过！");
            println!("全局配置:");
            println!("  日志级别: {}", config.global.log_level);
            println!("  请求超时: {}秒", config.global.request_timeout_seconds);

            println!("Slack配置:");
            println!("  团队域名: {}", config.slack.team_domain);
            println!("  主机: {}", config.slack.host);
            println!(
                "  静态令牌: {}",
                if config.slack.token.is_some() { "已配置" } else { "未配置" }
            );
            println!(
                "  凭据ID: {}",
                config.slack.credential_id().unwrap_or("未配置")
            );
            println!("  本地凭据: {} 个", config.credentials.len());
            println!("房间:");
            for (i, room) in rooms.iter().enumerate() {
                println!("  {}. {}", i + 1, room);
            }
        } else {
            println!("✓ 配置文件验证通过");
            println!("✓ 找到 {} 个房间", rooms.len());
        }

        Ok(())
    }
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Version { format } = &args.command {
            match format {
                OutputFormat::Json => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    println!("{}", serde_json::to_string_pretty(&version_info)?);
                }
                OutputFormat::Text => {
                    println!("{} v{}", crate::APP_NAME, crate::VERSION);
                    println!("{}", crate::APP_DESCRIPTION);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use tempfile::TempDir;

    #[tokio::test]
    #[serial]
    async fn test_init_then_validate() {
        std::env::set_var("SLACK_TOKEN", "xoxb-real");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path_str = path.to_string_lossy().to_string();

        let init = Args::try_parse_from(["slack-notifier", "init", path_str.as_str()]).unwrap();
        InitCommand.execute(&init).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[slack]"));
        assert!(content.starts_with("# 生成时间"));

        let validate =
            Args::try_parse_from(["slack-notifier", "validate", path_str.as_str()]).unwrap();
        ValidateCommand.execute(&validate).await.unwrap();

        let config = TomlConfigLoader::new(true)
            .load_from_file(&path)
            .await
            .unwrap();
        assert_eq!(config.slack.token.as_deref(), Some("xoxb-real"));
        assert_eq!(config.slack.room_ids(), vec!["#ci", "#alerts"]);

        std::env::remove_var("SLACK_TOKEN");
    }

    #[tokio::test]
    async fn test_init_does_not_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "existing").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let init = Args::try_parse_from(["slack-notifier", "init", path_str.as_str()]).unwrap();
        InitCommand.execute(&init).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");

        let forced =
            Args::try_parse_from(["slack-notifier", "init", path_str.as_str(), "--force"]).unwrap();
        InitCommand.execute(&forced).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[slack]"));
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let args = Args::try_parse_from([
            "slack-notifier",
            "validate",
            "/nonexistent/slack-notifier/config.toml",
        ])
        .unwrap();

        assert!(ValidateCommand.execute(&args).await.is_err());
    }
}
