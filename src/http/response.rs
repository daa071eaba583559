use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::HeaderMap as Headers;
use serde_json::Value;

use crate::http::types::Status;
use crate::json::ExtractionError;

/// 一次请求执行得到的响应描述
///
/// body 仅在第一次访问 JSON 时解析，结果缓存在 `json` 中供后续所有提取复用。
#[derive(Debug)]
pub struct ResponseDescriptor {
    status: Status,
    headers: Headers,
    body: Vec<u8>,
    elapsed: Duration,
    json: OnceLock<Result<Value, String>>,
}

impl ResponseDescriptor {
    pub fn new(status: u16, headers: Headers, body: Vec<u8>, elapsed: Duration) -> Self {
        Self {
            status: Status::new(status),
            headers,
            body,
            elapsed,
            json: OnceLock::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// 以文本形式读取 body（非 UTF-8 字节会被替换）
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// 从发送请求到 body 接收完毕的耗时
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    /// 解析后的 JSON 树，最多解析一次
    pub fn json(&self) -> Result<&Value, ExtractionError> {
        self.json
            .get_or_init(|| {
                tracing::trace!(bytes = self.body.len(), "parsing response body as JSON");
                serde_json::from_slice(&self.body).map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|e| ExtractionError::MalformedBody(e.clone()))
    }

    pub fn is_json_parsed(&self) -> bool {
        self.json.get().is_some()
    }
}
