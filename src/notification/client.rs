//! HTTP客户端模块
//!
//! 定义webhook请求的发送接口，以及基于reqwest的实现和用于测试的录制实现

use crate::error::NotificationError;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// 表单编码的内容类型，固定使用UTF-8
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// webhook POST请求
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRequest {
    /// 完整的请求URL（含token查询参数）
    pub url: String,
    /// 表单参数
    pub form: Vec<(String, String)>,
}

impl WebhookRequest {
    /// 创建新的POST请求
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            form: Vec::new(),
        }
    }

    /// 添加表单参数
    pub fn add_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }

    /// 获取表单参数值
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// webhook响应
#[derive(Debug, Clone, PartialEq)]
pub struct ClientResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 响应体
    pub body: String,
}

impl ClientResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

/// HTTP客户端trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// 发送请求，返回状态码和响应体；传输失败时返回错误
    async fn send(&self, request: &WebhookRequest) -> Result<ClientResponse, NotificationError>;
}

/// 基于reqwest的HTTP客户端
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// 创建新的客户端
    ///
    /// # 参数
    /// * `timeout` - 请求超时时间
    pub fn new(timeout: Duration) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: &WebhookRequest) -> Result<ClientResponse, NotificationError> {
        let mut http_request = self
            .client
            .post(&request.url)
            .form(&request.form)
            .build()?;
        http_request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        let response = self.client.execute(http_request).await?;
        let status_code = response.status().as_u16();
        // 读取完整响应体，连接随响应一起释放
        let body = response.text().await?;

        debug!("webhook响应: {} ({} 字节)", status_code, body.len());

        Ok(ClientResponse { status_code, body })
    }
}

/// 录制型HTTP客户端
///
/// 记录每次收到的请求，并按顺序回放预设的响应。
/// 预设用完后返回 `200 ok`。
#[derive(Default)]
pub struct RecordingClient {
    requests: Mutex<Vec<WebhookRequest>>,
    responses: Mutex<VecDeque<Result<ClientResponse, NotificationError>>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预设下一次响应
    pub fn push_response(&self, status_code: u16, body: impl Into<String>) {
        self.lock_responses()
            .push_back(Ok(ClientResponse::new(status_code, body)));
    }

    /// 预设下一次请求以传输错误结束
    pub fn push_transport_error(&self, message: impl Into<String>) {
        self.lock_responses()
            .push_back(Err(NotificationError::Transport(message.into())));
    }

    /// 获取已记录的请求
    pub fn requests(&self) -> Vec<WebhookRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 已记录的请求数量
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn lock_responses(
        &self,
    ) -> std::sync::MutexGuard<'_, VecDeque<Result<ClientResponse, NotificationError>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn send(&self, request: &WebhookRequest) -> Result<ClientResponse, NotificationError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        self.lock_responses()
            .pop_front()
            .unwrap_or_else(|| Ok(ClientResponse::new(200, "ok")))
    }
}
