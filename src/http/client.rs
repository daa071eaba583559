use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::TransportError;
use crate::http::request::RequestDescriptor;
use crate::http::response::ResponseDescriptor;

/// 执行请求的 HTTP 客户端
///
/// 内部的 `reqwest::Client` 持有连接池，克隆开销很小，可在多个并发场景间共享。
/// 每次 `send` 只做一次网络往返，不做任何重试。
#[derive(Clone, Debug)]
pub struct Client {
    inner: reqwest::Client,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// 发送请求并在 `timeout` 内读完整个 body
    ///
    /// 超时后整个请求 future 被丢弃，连接随之释放，不会回到连接池。
    pub async fn send(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<ResponseDescriptor, TransportError> {
        let url = request.url().to_string();
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

        let mut req = self
            .inner
            .request(request.method().to_reqwest(), request.url().clone())
            .headers(request.headers().clone())
            .timeout(timeout);
        if let Some(body) = request.body() {
            req = req.body(body.to_vec());
        }

        debug!(method = %request.method(), url = %url, "sending request");

        let start = Instant::now();
        let exchange = async {
            let response = req.send().await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, headers, body))
        };

        let (status, headers, body) = match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok(parts)) => parts,
            Ok(Err(e)) => {
                let err = TransportError::from_reqwest(&url, timeout_ms, e);
                warn!(url = %url, error = %err, "request failed");
                return Err(err);
            }
            Err(_) => {
                warn!(url = %url, timeout_ms, "request timed out");
                return Err(TransportError::Timeout {
                    url,
                    timeout_ms,
                    source: None,
                });
            }
        };
        let elapsed = start.elapsed();

        debug!(
            url = %url,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "response received"
        );

        Ok(ResponseDescriptor::new(status, headers, body.to_vec(), elapsed))
    }
}
