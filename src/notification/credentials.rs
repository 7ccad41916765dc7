//! 凭据存储模块
//!
//! 按凭据ID解析明文密钥。查询不到或查询失败都由调用方回退到静态令牌。

use crate::error::NotificationError;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// 环境变量凭据的前缀
pub const ENV_CREDENTIAL_PREFIX: &str = "SLACK_NOTIFIER_CREDENTIAL_";

/// 凭据存储trait
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 解析凭据ID对应的明文密钥
    ///
    /// # 返回
    /// * `Ok(Some(secret))` - 找到凭据
    /// * `Ok(None)` - 没有匹配的凭据
    /// * `Err(_)` - 存储不可用
    async fn resolve_secret(&self, credential_id: &str)
        -> Result<Option<String>, NotificationError>;
}

/// 空凭据存储，总是返回未找到
pub struct NoCredentials;

#[async_trait]
impl CredentialStore for NoCredentials {
    async fn resolve_secret(
        &self,
        _credential_id: &str,
    ) -> Result<Option<String>, NotificationError> {
        Ok(None)
    }
}

/// 内存凭据存储，通常由配置文件的 `[credentials]` 表构建
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    secrets: HashMap<String, String>,
}

impl InMemoryCredentialStore {
    pub fn new(secrets: HashMap<String, String>) -> Self {
        Self { secrets }
    }

    /// 添加凭据
    pub fn with_secret(mut self, credential_id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.secrets.insert(credential_id.into(), secret.into());
        self
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn resolve_secret(
        &self,
        credential_id: &str,
    ) -> Result<Option<String>, NotificationError> {
        Ok(self.secrets.get(credential_id).cloned())
    }
}

/// 环境变量凭据存储
///
/// 凭据ID `slack-token` 对应环境变量 `SLACK_NOTIFIER_CREDENTIAL_SLACK_TOKEN`
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialStore;

impl EnvCredentialStore {
    /// 计算凭据ID对应的环境变量名
    pub fn variable_name(credential_id: &str) -> String {
        let suffix: String = credential_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{ENV_CREDENTIAL_PREFIX}{suffix}")
    }
}

#[async_trait]
impl CredentialStore for EnvCredentialStore {
    async fn resolve_secret(
        &self,
        credential_id: &str,
    ) -> Result<Option<String>, NotificationError> {
        let name = Self::variable_name(credential_id);
        match std::env::var(&name) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(NotificationError::Credential(format!("{name}: {e}"))),
        }
    }
}

/// 链式凭据存储，按顺序查询，第一个命中的结果生效
#[derive(Default)]
pub struct ChainedCredentialStore {
    stores: Vec<Box<dyn CredentialStore>>,
}

impl ChainedCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个凭据存储
    pub fn with_store(mut self, store: impl CredentialStore + 'static) -> Self {
        self.stores.push(Box::new(store));
        self
    }
}

#[async_trait]
impl CredentialStore for ChainedCredentialStore {
    async fn resolve_secret(
        &self,
        credential_id: &str,
    ) -> Result<Option<String>, NotificationError> {
        for store in &self.stores {
            match store.resolve_secret(credential_id).await {
                Ok(Some(secret)) => return Ok(Some(secret)),
                Ok(None) => continue,
                Err(e) => {
                    debug!("凭据存储查询失败，尝试下一个: {}", e);
                }
            }
        }
        Ok(None)
    }
}
