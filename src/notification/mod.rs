//! 通知模块
//!
//! 提供Slack webhook通知、HTTP客户端抽象和凭据解析功能

pub mod client;
pub mod credentials;
pub mod payload;
pub mod slack;

// 重新导出主要类型
pub use client::{ClientResponse, HttpClient, RecordingClient, ReqwestClient, WebhookRequest};
pub use credentials::{
    ChainedCredentialStore, CredentialStore, EnvCredentialStore, InMemoryCredentialStore,
    NoCredentials,
};
pub use payload::SlackPayload;
pub use slack::{SlackService, StandardSlackService};
