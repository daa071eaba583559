use crate::http::Status;
use crate::runner::ScenarioResult;
use colored::*;

pub enum ResponseFormat {
    Compact,
    Verbose,
}

/// 将场景结果中的响应信息格式化为终端输出
pub struct ResponseFormatter {
    format: ResponseFormat,
    color: bool,
}

impl ResponseFormatter {
    /// Compact 模式下超过该长度的 body 只显示字节数
    const COMPACT_BODY_LIMIT: usize = 200;

    pub fn new(format: ResponseFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn format(&self, result: &ScenarioResult) -> String {
        let mut output = Vec::new();
        let status = Status::new(result.status);
        let status_line = format!("HTTP {}", status);
        let timing = format!("Time: {}ms", result.elapsed_ms);

        if self.color {
            output.push(status_line.color(status_color(status)).to_string());
            output.push(timing.cyan().to_string());
        } else {
            output.push(status_line);
            output.push(timing);
        }

        if let Some(body) = result.body.as_deref() {
            match self.format {
                ResponseFormat::Compact if body.len() >= Self::COMPACT_BODY_LIMIT => {
                    output.push(format!("Body: {} bytes", body.len()));
                }
                ResponseFormat::Compact => output.push(body.to_string()),
                ResponseFormat::Verbose => {
                    output.push(String::new());
                    if self.color {
                        output.push("Body:".blue().bold().to_string());
                    } else {
                        output.push("Body:".to_string());
                    }
                    // 尝试格式化 JSON，失败则显示原始内容
                    output.push(try_format_json(body).unwrap_or_else(|| body.to_string()));
                }
            }
        }

        output.join("\n")
    }
}

/// 2xx 绿色，4xx 黄色，5xx 红色，其余蓝色
fn status_color(status: Status) -> Color {
    if status.is_success() {
        Color::Green
    } else if status.is_client_error() {
        Color::Yellow
    } else if status.is_server_error() {
        Color::Red
    } else {
        Color::Blue
    }
}

/// 尝试将 body 格式化为漂亮的 JSON
fn try_format_json(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    serde_json::to_string_pretty(&value).ok()
}
