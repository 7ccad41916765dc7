//! 配置加载器实现
//!
//! 提供TOML配置文件解析、环境变量替换和错误处理功能

use crate::config::types::{validate_config, Config};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config>;

    /// 从字符串加载配置
    async fn load_from_string(&self, content: &str) -> Result<Config>;

    /// 验证配置
    fn validate(&self, config: &Config) -> Result<()>;
}

/// TOML配置加载器实现
#[derive(Debug, Clone)]
pub struct TomlConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl TomlConfigLoader {
    /// 创建新的TOML配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换配置内容中的 `${NAME}` 占位符
    ///
    /// 以 `#` 开头的注释行保持原样；变量缺失时返回 [`ConfigError::EnvVarError`]
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let placeholder = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut lines = Vec::new();
        for line in content.lines() {
            if line.trim_start().starts_with('#') {
                lines.push(line.to_string());
                continue;
            }

            let mut missing: Option<String> = None;
            let replaced = placeholder.replace_all(line, |caps: &Captures| {
                std::env::var(&caps[1]).unwrap_or_else(|_| {
                    missing.get_or_insert_with(|| caps[1].to_string());
                    String::new()
                })
            });

            if let Some(var) = missing {
                return Err(ConfigError::EnvVarError { var }.into());
            }
            lines.push(replaced.into_owned());
        }

        Ok(lines.join("\n"))
    }

    /// 替换变量、解析TOML并验证，`origin` 仅用于日志
    fn parse_and_validate(&self, content: &str, origin: &str) -> Result<Config> {
        let config: Config = toml::from_str(&self.substitute_env_vars(content)?)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败 ({}): {}", origin, e)))?;
        self.validate(&config)?;

        log::debug!(
            "已加载配置 {}: team_domain={}, host={}, rooms={:?}",
            origin,
            config.slack.team_domain,
            config.slack.host,
            config.slack.room_ids()
        );
        Ok(config)
    }
}

impl Default for TomlConfigLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ConfigLoader for TomlConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config> {
        let path = path.as_ref();
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound {
                    path: path.to_string_lossy().to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(ConfigError::ParseError(format!("读取文件失败: {}", e)).into());
            }
        };

        let config = self.parse_and_validate(&content, &path.display().to_string())?;
        log::info!("成功加载配置文件: {}", path.display());
        Ok(config)
    }

    async fn load_from_string(&self, content: &str) -> Result<Config> {
        self.parse_and_validate(content, "<string>")
    }

    fn validate(&self, config: &Config) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}

/// 获取默认配置文件路径
///
/// 优先使用当前目录的 `config.toml`，否则使用系统配置目录下的
/// `slack-notifier/config.toml`
pub fn get_default_config_path() -> PathBuf {
    if Path::new("config.toml").exists() {
        return PathBuf::from("config.toml");
    }

    dirs::config_dir()
        .map(|config_dir| config_dir.join("slack-notifier").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifierError;
    use serial_test::serial;
    use std::env;

    const TEST_CONFIG_TOML: &str = r##"
[global]
log_level = "debug"
request_timeout_seconds = 10

[slack]
team_domain = "myteam"
token = "static-token"
auth_token_credential_id = "slack-token"
room = "#ci, #alerts"

[credentials]
slack-token = "stored-secret"
"##;

    const TEST_CONFIG_WITH_ENV_VARS: &str = r##"
[slack]
team_domain = "myteam"
token = "${SLACK_NOTIFIER_TEST_TOKEN}"
room = "#ci"
"##;

    #[tokio::test]
    async fn test_toml_parsing() {
        let loader = TomlConfigLoader::new(false);
        let config = loader.load_from_string(TEST_CONFIG_TOML).await.unwrap();

        assert_eq!(config.global.log_level, "debug");
        assert_eq!(config.global.request_timeout_seconds, 10);
        assert_eq!(config.slack.team_domain, "myteam");
        assert_eq!(config.slack.host, "slack.com");
        assert_eq!(config.slack.token.as_deref(), Some("static-token"));
        assert_eq!(config.slack.room_ids(), vec!["#ci", "#alerts"]);
        assert_eq!(
            config.credentials.get("slack-token"),
            Some(&"stored-secret".to_string())
        );
    }

    #[tokio::test]
    async fn test_global_section_optional() {
        let loader = TomlConfigLoader::new(false);
        let config = loader
            .load_from_string("[slack]\nteam_domain = \"t\"\nroom = \"#a\"\n")
            .await
            .unwrap();

        assert_eq!(config.global.log_level, "info");
        assert_eq!(config.global.request_timeout_seconds, 30);
        assert!(config.credentials.is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_env_var_substitution() {
        env::set_var("SLACK_NOTIFIER_TEST_TOKEN", "env-token-123");

        let loader = TomlConfigLoader::new(true);
        let config = loader
            .load_from_string(TEST_CONFIG_WITH_ENV_VARS)
            .await
            .unwrap();

        assert_eq!(config.slack.token.as_deref(), Some("env-token-123"));

        env::remove_var("SLACK_NOTIFIER_TEST_TOKEN");
    }

    #[tokio::test]
    #[serial]
    async fn test_env_var_substitution_missing_var() {
        env::remove_var("SLACK_NOTIFIER_TEST_TOKEN");

        let loader = TomlConfigLoader::new(true);
        let result = loader.load_from_string(TEST_CONFIG_WITH_ENV_VARS).await;

        match result {
            Err(NotifierError::Config(ConfigError::EnvVarError { var })) => {
                assert_eq!(var, "SLACK_NOTIFIER_TEST_TOKEN");
            }
            other => panic!("期望环境变量错误, 实际: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_room_rejected() {
        let loader = TomlConfigLoader::new(false);
        let result = loader
            .load_from_string("[slack]\nteam_domain = \"t\"\nroom = \" , \"\n")
            .await;

        assert!(matches!(
            result,
            Err(NotifierError::Config(ConfigError::ValidationError(_)))
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let loader = TomlConfigLoader::new(false);
        let result = loader.load_from_file("/nonexistent/slack-notifier.toml").await;

        assert!(matches!(
            result,
            Err(NotifierError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_parse_error_names_origin() {
        let loader = TomlConfigLoader::new(false);

        match loader.load_from_string("[slack\nteam_domain = 1").await {
            Err(NotifierError::Config(ConfigError::ParseError(msg))) => {
                assert!(msg.contains("<string>"), "{}", msg);
            }
            other => panic!("期望解析错误, 实际: {:?}", other),
        }

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "room = ").unwrap();

        match loader.load_from_file(&path).await {
            Err(NotifierError::Config(ConfigError::ParseError(msg))) => {
                assert!(msg.contains("broken.toml"), "{}", msg);
            }
            other => panic!("期望解析错误, 实际: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_substitute_env_vars_skips_comment_lines() {
        env::set_var("SLACK_NOTIFIER_TEST_TOKEN", "xoxb-env");
        env::remove_var("SLACK_NOTIFIER_UNSET_VAR");

        let loader = TomlConfigLoader::new(true);
        let content = "# 示例: ${SLACK_NOTIFIER_UNSET_VAR}\n  # ${SLACK_NOTIFIER_UNSET_VAR}\ntoken = \"${SLACK_NOTIFIER_TEST_TOKEN}\"";
        let result = loader.substitute_env_vars(content).unwrap();

        assert_eq!(
            result,
            "# 示例: ${SLACK_NOTIFIER_UNSET_VAR}\n  # ${SLACK_NOTIFIER_UNSET_VAR}\ntoken = \"xoxb-env\""
        );

        env::remove_var("SLACK_NOTIFIER_TEST_TOKEN");
    }

    #[test]
    fn test_substitute_env_vars_disabled() {
        let loader = TomlConfigLoader::new(false);
        let content = "test ${VAR} content";
        let result = loader.substitute_env_vars(content).unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_get_default_config_path() {
        let path = get_default_config_path();
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
