use thiserror::Error;

/// 请求描述构建失败（调用方配置错误，发生在任何网络活动之前）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("HTTP method is not set")]
    MissingMethod,

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Base URI is not set")]
    MissingBaseUri,

    #[error("Invalid base URI '{uri}': {reason}")]
    InvalidBaseUri { uri: String, reason: String },

    #[error("Request path is empty")]
    EmptyPath,

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Request body is not valid JSON: {0}")]
    InvalidBody(String),
}

/// 网络层错误：连接失败、DNS 失败、超时
#[derive(Error, Debug)]
pub enum TransportError {
    /// `source` 为 reqwest 自身报告的超时；由外层计时器触发时为 None
    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout {
        url: String,
        timeout_ms: u64,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    /// 将 reqwest 错误归类；reqwest 自身的超时也归入 Timeout
    pub(crate) fn from_reqwest(url: &str, timeout_ms: u64, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                timeout_ms,
                source: Some(source),
            }
        } else if source.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                source,
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                source,
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ApicheckError {
    #[error("配置错误: {0}")]
    Configuration(#[from] ConfigError),

    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),

    #[error("断言语法错误: {0}")]
    Assertion(#[from] crate::assertion::AssertError),

    #[error("套件文件错误: {0}")]
    Suite(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML 解析错误: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON 错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ApicheckError {
    fn from(err: anyhow::Error) -> Self {
        ApicheckError::Other(err.to_string())
    }
}

/// Result type for apicheck crate
pub type Result<T> = std::result::Result<T, ApicheckError>;
