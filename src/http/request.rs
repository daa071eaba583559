use reqwest::header::{CONTENT_TYPE, HeaderMap as Headers, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

use crate::error::ConfigError;
use crate::http::types::Method;

const JSON_CONTENT_TYPE: &str = "application/json";

/// 请求描述的构建器
///
/// 每个设置方法都消费并返回新的构建器，不存在共享的可变状态；
/// 校验统一推迟到 [`RequestBuilder::build`]，构建过程没有任何副作用。
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    base_uri: Option<String>,
    path: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn get(self) -> Self {
        self.method(Method::Get)
    }

    pub fn post(self) -> Self {
        self.method(Method::Post)
    }

    pub fn put(self) -> Self {
        self.method(Method::Put)
    }

    pub fn patch(self) -> Self {
        self.method(Method::Patch)
    }

    pub fn delete(self) -> Self {
        self.method(Method::Delete)
    }

    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// 添加 header；同名（不区分大小写）的后者覆盖前者
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// 原始 body，默认按 JSON 处理
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json_body<T: Serialize>(mut self, data: &T) -> Result<Self, ConfigError> {
        let bytes = serde_json::to_vec(data).map_err(|e| ConfigError::InvalidBody(e.to_string()))?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn build(&self) -> Result<RequestDescriptor, ConfigError> {
        let method = self.method.ok_or(ConfigError::MissingMethod)?;
        let mut url = self.parse_base_uri()?;

        let path = self.path.trim();
        if path.is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }

        let mut headers = Headers::new();
        for (key, value) in &self.headers {
            let name = HeaderName::from_bytes(key.trim().as_bytes()).map_err(|e| {
                ConfigError::InvalidHeader {
                    name: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            let value = HeaderValue::from_str(value.trim()).map_err(|e| {
                ConfigError::InvalidHeader {
                    name: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(name, value);
        }

        if let Some(body) = &self.body {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            }
            let is_json = headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|ct| ct.contains("json"));
            if is_json && !body.is_empty() {
                serde_json::from_slice::<serde::de::IgnoredAny>(body)
                    .map_err(|e| ConfigError::InvalidBody(e.to_string()))?;
            }
        }

        Ok(RequestDescriptor {
            method,
            url,
            headers,
            body: self.body.clone(),
        })
    }

    fn parse_base_uri(&self) -> Result<Url, ConfigError> {
        let raw = self.base_uri.as_deref().ok_or(ConfigError::MissingBaseUri)?;
        let invalid = |reason: String| ConfigError::InvalidBaseUri {
            uri: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        Ok(url)
    }
}

/// 构建完成后不可变的请求描述
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    headers: Headers,
    body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    pub fn method(&self) -> Method {
        self.method
    }

    /// base URI、path 与 query 合并后的完整 URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}
