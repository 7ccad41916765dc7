//! Slack通知服务模块
//!
//! 实现向每个配置房间逐个发送附件消息的webhook通知

use crate::config::types::{validate_service_config, Config, ServiceConfig};
use crate::error::{ConfigError, NotificationError, Result};
use crate::notification::client::{HttpClient, ReqwestClient, WebhookRequest};
use crate::notification::credentials::{
    ChainedCredentialStore, CredentialStore, EnvCredentialStore, InMemoryCredentialStore,
    NoCredentials,
};
use crate::notification::payload::{SlackPayload, DEFAULT_COLOR};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// webhook路径
pub const WEBHOOK_PATH: &str = "/services/hooks/jenkins-ci";

/// Slack通知服务trait
#[async_trait]
pub trait SlackService: Send + Sync {
    /// 向所有配置的房间发布消息
    ///
    /// # 参数
    /// * `message` - 消息内容
    /// * `color` - 附件颜色，如 `good`、`warning`、`danger`
    ///
    /// # 返回
    /// * `bool` - 所有房间都发送成功时为 `true`
    async fn publish(&self, message: &str, color: &str) -> bool;

    /// 使用默认颜色 `warning` 发布消息
    async fn publish_default(&self, message: &str) -> bool {
        self.publish(message, DEFAULT_COLOR).await
    }

    /// 根据邮箱查询Slack用户ID
    fn get_user_id(&self, email: &str) -> String;
}

/// 标准Slack通知服务
pub struct StandardSlackService {
    team_domain: String,
    host: String,
    token: String,
    credential_id: Option<String>,
    room_ids: Vec<String>,
    api_token: Option<String>,
    client: Arc<dyn HttpClient>,
    credentials: Arc<dyn CredentialStore>,
}

impl StandardSlackService {
    /// 创建新的通知服务
    ///
    /// # 参数
    /// * `config` - Slack服务配置
    /// * `client` - HTTP客户端
    /// * `credentials` - 凭据存储
    ///
    /// # 返回
    /// * `Result<Self>` - 配置无效（例如没有房间）时返回错误
    pub fn new(
        config: &ServiceConfig,
        client: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        validate_service_config(config).map_err(ConfigError::ValidationError)?;

        Ok(Self {
            team_domain: config.team_domain.clone(),
            host: config.host.clone(),
            token: config.token.clone().unwrap_or_default(),
            credential_id: config.credential_id().map(str::to_string),
            room_ids: config.room_ids(),
            api_token: config.api_token.clone(),
            client,
            credentials,
        })
    }

    /// 使用静态令牌创建服务，不查询凭据存储
    pub fn with_static_token(config: &ServiceConfig, client: Arc<dyn HttpClient>) -> Result<Self> {
        Self::new(config, client, Arc::new(NoCredentials))
    }

    /// 根据完整配置创建生产环境服务
    ///
    /// 凭据依次从配置文件的 `[credentials]` 表和环境变量中查找
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ReqwestClient::new(Duration::from_secs(
            config.global.request_timeout_seconds,
        ))?;
        let credentials = ChainedCredentialStore::new()
            .with_store(InMemoryCredentialStore::new(config.credentials.clone()))
            .with_store(EnvCredentialStore);

        Self::new(&config.slack, Arc::new(client), Arc::new(credentials))
    }

    /// 解析后的房间列表
    pub fn room_ids(&self) -> &[String] {
        &self.room_ids
    }

    /// API令牌
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// 构建webhook URL
    pub fn webhook_url(&self, token: &str) -> String {
        format!(
            "https://{}.{}{}?token={}",
            self.team_domain, self.host, WEBHOOK_PATH, token
        )
    }

    /// 解析本次请求使用的令牌
    ///
    /// 配置了凭据ID且存储中存在匹配凭据时使用凭据密钥，否则使用静态令牌
    async fn token_to_use(&self) -> String {
        if let Some(credential_id) = &self.credential_id {
            match self.credentials.resolve_secret(credential_id).await {
                Ok(Some(secret)) => {
                    debug!("使用凭据ID中的集成令牌");
                    return secret;
                }
                Ok(None) => debug!("未找到凭据: {}", credential_id),
                Err(e) => debug!("凭据查询失败: {}", e),
            }
        }

        debug!("使用静态集成令牌");
        self.token.clone()
    }

    /// 向单个房间发送消息
    async fn post_to_room(
        &self,
        room_id: &str,
        message: &str,
        color: &str,
    ) -> std::result::Result<bool, NotificationError> {
        let url = self.webhook_url(&self.token_to_use().await);
        debug!(
            "发送到房间 {} ({}.{}): {} {}",
            room_id, self.team_domain, self.host, message, color
        );

        let payload = SlackPayload::new(room_id, message, color).to_json()?;
        let request = WebhookRequest::new(url).add_parameter("payload", payload);

        let response = self.client.send(&request).await?;
        if response.status_code != 200 {
            warn!(
                "Slack消息可能发送失败: 房间 {}, 状态码 {}, 响应: {}",
                room_id, response.status_code, response.body
            );
            return Ok(false);
        }

        debug!("Slack消息发送成功: {}", room_id);
        Ok(true)
    }
}

#[async_trait]
impl SlackService for StandardSlackService {
    async fn publish(&self, message: &str, color: &str) -> bool {
        let mut result = true;

        for room_id in &self.room_ids {
            match self.post_to_room(room_id, message, color).await {
                Ok(true) => {}
                Ok(false) => result = false,
                Err(e) => {
                    warn!("发送Slack消息出错: 房间 {}: {}", room_id, e);
                    result = false;
                }
            }
        }

        result
    }

    fn get_user_id(&self, _email: &str) -> String {
        String::new()
    }
}
