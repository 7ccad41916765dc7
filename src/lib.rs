//! Slack Notifier - Slack webhook 通知工具
//!
//! 这是一个用Rust编写的Slack通知适配器，支持：
//! - 向多个房间逐个投递附件消息
//! - 静态令牌或凭据存储解析认证令牌
//! - TOML配置与环境变量替换
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notification;

// 重新导出主要类型
pub use config::{Config, GlobalConfig, ServiceConfig};
pub use error::NotifierError;
pub use notification::{SlackService, StandardSlackService};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
