use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::ApicheckError;
use crate::http::Client;
use crate::runner::scenario::Scenario;
use crate::runner::types::{ScenarioReport, ScenarioResult};
use crate::Result;

/// 场景执行器：构建请求 → 发送 → 断言 → 结果
#[derive(Clone, Debug)]
pub struct ScenarioRunner {
    client: Client,
    timeout: Duration,
    concurrency: usize,
    capture_body: bool,
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRunner {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_CONCURRENCY: usize = 4;

    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            timeout: Self::DEFAULT_TIMEOUT,
            concurrency: Self::DEFAULT_CONCURRENCY,
            capture_body: false,
        }
    }

    /// 每次发送的超时时间
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `run_all` 同时执行的场景数上限（至少为 1）
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// 在结果中保留响应 body，用于详细输出
    pub fn with_capture_body(mut self, capture: bool) -> Self {
        self.capture_body = capture;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 执行单个场景
    ///
    /// 请求构建失败（配置错误）或网络失败时直接返回错误，不产生部分结果；
    /// 路径解析失败只会记录为失败的断言。
    pub async fn run(&self, scenario: &Scenario) -> Result<ScenarioResult> {
        let request = scenario.request().build()?;
        let started_at = Utc::now();

        let response = self.client.send(&request, self.timeout).await?;
        let outcomes = scenario.assertions().evaluate(&response);

        let body = self
            .capture_body
            .then(|| response.text().into_owned())
            .filter(|b| !b.is_empty());

        let result = ScenarioResult::new(
            scenario.name().to_string(),
            started_at,
            request.method(),
            request.url().to_string(),
            response.status().code(),
            response.elapsed_ms(),
            outcomes,
            body,
        );

        info!(
            scenario = %result.name,
            passed = result.passed,
            status = result.status,
            elapsed_ms = result.elapsed_ms,
            "scenario finished"
        );

        Ok(result)
    }

    /// 并行执行所有场景，返回的报告与输入顺序一致
    pub async fn run_all(&self, scenarios: Vec<Scenario>) -> Vec<ScenarioReport> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let handles: Vec<(String, JoinHandle<Result<ScenarioResult>>)> = scenarios
            .into_iter()
            .map(|scenario| {
                let runner = self.clone();
                let semaphore = Arc::clone(&semaphore);
                let name = scenario.name().to_string();
                let handle = tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| ApicheckError::Other(e.to_string()))?;
                    runner.run(&scenario).await
                });
                (name, handle)
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ApicheckError::Other(format!("scenario task failed: {}", e))),
            };
            if let Err(e) = &outcome {
                warn!(scenario = %name, error = %e, "scenario aborted");
            }
            reports.push(ScenarioReport { name, outcome });
        }
        reports
    }
}
