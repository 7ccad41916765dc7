//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 主配置结构，包含全局配置、Slack服务配置和本地凭据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 全局配置项
    #[serde(default)]
    pub global: GlobalConfig,
    /// Slack服务配置
    pub slack: ServiceConfig,
    /// 凭据表（凭据ID -> 明文密钥）
    #[serde(default)]
    pub credentials: HashMap<String, String>,
}

/// 全局配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

/// Slack服务配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// 团队域名，例如 `myteam` 对应 `myteam.slack.com`
    pub team_domain: String,
    /// Slack主机
    #[serde(default = "default_host")]
    pub host: String,
    /// 静态集成令牌
    pub token: Option<String>,
    /// 集成令牌的凭据ID
    pub auth_token_credential_id: Option<String>,
    /// 房间列表，以 `,`、`;` 或空白分隔
    pub room: String,
    /// API令牌（发布逻辑暂未使用）
    pub api_token: Option<String>,
}

impl ServiceConfig {
    /// 创建新的服务配置，主机使用默认值
    pub fn new(team_domain: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            team_domain: team_domain.into(),
            host: default_host(),
            token: None,
            auth_token_credential_id: None,
            room: room.into(),
            api_token: None,
        }
    }

    /// 设置静态令牌
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// 设置凭据ID
    pub fn with_credential_id(mut self, credential_id: impl Into<String>) -> Self {
        self.auth_token_credential_id = Some(credential_id.into());
        self
    }

    /// 设置主机
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// 设置API令牌
    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    /// 解析房间列表
    pub fn room_ids(&self) -> Vec<String> {
        split_room_ids(&self.room)
    }

    /// 去除首尾空白后的凭据ID，空字符串视为未配置
    pub fn credential_id(&self) -> Option<&str> {
        self.auth_token_credential_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// 按 `,`、`;` 或空白拆分房间字符串，丢弃空段
pub fn split_room_ids(room: &str) -> Vec<String> {
    room.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

// 默认值函数
fn default_log_level() -> String {
    "info".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_host() -> String {
    "slack.com".to_string()
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.global.request_timeout_seconds == 0 {
        return Err("请求超时时间不能为0".to_string());
    }

    // 验证日志级别
    let valid_log_levels = ["debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.global.log_level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.global.log_level, valid_log_levels
        ));
    }

    validate_service_config(&config.slack)
}

/// 验证Slack服务配置
pub fn validate_service_config(service: &ServiceConfig) -> Result<(), String> {
    if service.team_domain.trim().is_empty() {
        return Err("团队域名不能为空".to_string());
    }

    if service.host.trim().is_empty() {
        return Err("Slack主机不能为空".to_string());
    }

    if service.room_ids().is_empty() {
        return Err("至少需要配置一个房间".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            global: GlobalConfig::default(),
            slack: ServiceConfig::new("myteam", "#ci").with_token("static-token"),
            credentials: HashMap::new(),
        }
    }

    #[test]
    fn test_split_room_ids_mixed_separators() {
        assert_eq!(split_room_ids("a,b c;d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_room_ids_collapses_runs() {
        assert_eq!(
            split_room_ids("#ci, #alerts ;;  #ops\t#dev"),
            vec!["#ci", "#alerts", "#ops", "#dev"]
        );
    }

    #[test]
    fn test_split_room_ids_drops_edge_separators() {
        assert_eq!(split_room_ids(" ,#ci; "), vec!["#ci"]);
        assert!(split_room_ids(" ,; ").is_empty());
    }

    #[test]
    fn test_default_host() {
        let service = ServiceConfig::new("myteam", "#ci");
        assert_eq!(service.host, "slack.com");
    }

    #[test]
    fn test_credential_id_trimmed() {
        let service = ServiceConfig::new("myteam", "#ci").with_credential_id("  slack-token ");
        assert_eq!(service.credential_id(), Some("slack-token"));

        let blank = ServiceConfig::new("myteam", "#ci").with_credential_id("   ");
        assert_eq!(blank.credential_id(), None);
    }

    #[test]
    fn test_validate_config_ok() {
        assert!(validate_config(&create_test_config()).is_ok());
    }

    #[test]
    fn test_validate_config_empty_rooms() {
        let mut config = create_test_config();
        config.slack.room = " ; , ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.contains("房间"));
    }

    #[test]
    fn test_validate_config_empty_team_domain() {
        let mut config = create_test_config();
        config.slack.team_domain = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_log_level() {
        let mut config = create_test_config();
        config.global.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_zero_timeout() {
        let mut config = create_test_config();
        config.global.request_timeout_seconds = 0;
        assert!(validate_config(&config).is_err());
    }
}
