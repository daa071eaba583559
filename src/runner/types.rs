use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::assertion::AssertionOutcome;
use crate::error::ApicheckError;
use crate::http::Method;

/// 单个场景的执行结果
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// 本次执行的唯一 ID
    pub run_id: Uuid,

    pub name: String,

    /// 请求发出的时间
    pub started_at: DateTime<Utc>,

    pub method: Method,

    pub url: String,

    pub status: u16,

    /// 从发送到 body 接收完毕的耗时
    pub elapsed_ms: u64,

    /// 每条断言的结果，顺序与声明一致
    pub outcomes: Vec<AssertionOutcome>,

    /// 所有断言都通过时为 true
    pub passed: bool,

    /// 响应 body，仅在开启 capture_body 时保留
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ScenarioResult {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        started_at: DateTime<Utc>,
        method: Method,
        url: String,
        status: u16,
        elapsed_ms: u64,
        outcomes: Vec<AssertionOutcome>,
        body: Option<String>,
    ) -> Self {
        let passed = outcomes.iter().all(|o| o.passed);
        Self {
            run_id: Uuid::new_v4(),
            name,
            started_at,
            method,
            url,
            status,
            elapsed_ms,
            outcomes,
            passed,
            body,
        }
    }

    pub fn failed_outcomes(&self) -> impl Iterator<Item = &AssertionOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

/// 批量执行中的一项：要么得到完整结果，要么是导致无法产生结果的硬错误
#[derive(Debug)]
pub struct ScenarioReport {
    pub name: String,
    pub outcome: Result<ScenarioResult, ApicheckError>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        matches!(&self.outcome, Ok(result) if result.passed)
    }

    pub fn result(&self) -> Option<&ScenarioResult> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ApicheckError> {
        self.outcome.as_ref().err()
    }
}

/// 测试摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// 配置错误或传输错误导致没有结果的场景
    pub errored: usize,
    pub total_assertions: usize,
    pub passed_assertions: usize,
    pub failed_assertions: usize,
    pub total_duration_ms: u64,
}

impl RunSummary {
    pub fn from_reports(reports: &[ScenarioReport], total_duration: Duration) -> Self {
        let results: Vec<&ScenarioResult> = reports.iter().filter_map(|r| r.result()).collect();
        let passed = results.iter().filter(|r| r.passed).count();
        let errored = reports.len() - results.len();

        // 统计断言
        let total_assertions = results.iter().map(|r| r.outcomes.len()).sum();
        let passed_assertions = results
            .iter()
            .flat_map(|r| &r.outcomes)
            .filter(|o| o.passed)
            .count();

        Self {
            total: reports.len(),
            passed,
            failed: results.len() - passed,
            errored,
            total_assertions,
            passed_assertions,
            failed_assertions: total_assertions - passed_assertions,
            total_duration_ms: u64::try_from(total_duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}
