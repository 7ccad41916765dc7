//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Slack Notifier 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum NotifierError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotificationError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 传输失败（连接、超时、读取响应体等）
    #[error("HTTP传输失败: {0}")]
    Transport(String),

    /// 凭据存储查询失败
    #[error("凭据查询失败: {0}")]
    Credential(String),

    /// HTTP客户端构建失败
    #[error("创建HTTP客户端失败: {0}")]
    ClientBuild(String),

    /// 消息体序列化失败
    #[error("序列化消息失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<reqwest::Error> for NotificationError {
    fn from(err: reqwest::Error) -> Self {
        NotificationError::Transport(err.to_string())
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, NotifierError>;
