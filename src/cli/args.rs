//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::config::{ConfigLoader, TomlConfigLoader};
use crate::logging::LogConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Slack Notifier - Slack webhook 通知工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "slack-notifier",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "SLACK_NOTIFIER_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 日志级别，未指定时使用配置文件中的 `global.log_level`
    #[arg(
        short,
        long,
        value_enum,
        help = "日志级别",
        env = "SLACK_NOTIFIER_LOG_LEVEL"
    )]
    pub log_level: Option<LogLevel>,

    /// 是否输出JSON格式日志
    #[arg(long, help = "输出JSON格式日志")]
    pub json_logs: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 向配置的房间发布消息
    Publish {
        /// 消息内容
        #[arg(value_name = "MESSAGE", help = "消息内容")]
        message: String,

        /// 附件颜色
        #[arg(
            long,
            value_name = "COLOR",
            default_value = "warning",
            help = "附件颜色（good、warning、danger 或十六进制色值）"
        )]
        color: String,

        /// 覆盖配置文件中的房间列表
        #[arg(
            short,
            long,
            value_name = "ROOMS",
            help = "房间列表，以逗号、分号或空白分隔",
            env = "SLACK_NOTIFIER_ROOM"
        )]
        room: Option<String>,
    },

    /// 初始化配置文件
    Init {
        /// 配置文件路径
        #[arg(
            value_name = "FILE",
            help = "配置文件路径",
            default_value = "config.toml"
        )]
        config_path: PathBuf,

        /// 是否覆盖现有文件
        #[arg(short, long, help = "覆盖现有文件")]
        force: bool,
    },

    /// 验证配置文件
    Validate {
        /// 配置文件路径
        #[arg(value_name = "FILE", help = "配置文件路径")]
        config_path: Option<PathBuf>,

        /// 是否显示详细信息
        #[arg(short, long, help = "显示详细信息")]
        verbose: bool,
    },

    /// 显示版本信息
    Version {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

impl Args {
    /// 获取配置文件路径
    pub fn get_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::loader::get_default_config_path)
    }

    /// 确定日志级别
    ///
    /// 命令行参数优先，其次是配置文件的 `global.log_level`，
    /// 配置不可用时（例如执行 `init` 之前）使用 info
    pub async fn resolve_log_level(&self) -> log::LevelFilter {
        if let Some(level) = &self.log_level {
            return level.clone().into();
        }

        match TomlConfigLoader::new(true)
            .load_from_file(self.get_config_path())
            .await
        {
            Ok(config) => LogConfig::parse_level(&config.global.log_level),
            Err(_) => log::LevelFilter::Info,
        }
    }
}
