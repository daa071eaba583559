use crate::runner::types::{RunSummary, ScenarioReport};
use crate::utils::{ResponseFormat, ResponseFormatter};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};
use serde::Serialize;

pub struct ScenarioReporter {
    verbose: bool,
    formatter: ResponseFormatter,
}

impl ScenarioReporter {
    pub fn new(verbose: bool) -> Self {
        let format = if verbose {
            ResponseFormat::Verbose
        } else {
            ResponseFormat::Compact
        };

        Self {
            verbose,
            formatter: ResponseFormatter::new(format),
        }
    }

    /// 打印单个场景结果
    pub fn print_report(&self, index: usize, report: &ScenarioReport) {
        let result = match &report.outcome {
            Ok(result) => result,
            Err(e) => {
                println!(
                    " {} [{}] {} {}",
                    "!".red().bold(),
                    index + 1,
                    report.name,
                    "(aborted)".dimmed()
                );
                println!("   {}: {}", "Error".red().bold(), e);
                println!();
                return;
            }
        };

        let symbol = if result.passed { "✓" } else { "✗" };
        let color = if result.passed { "green" } else { "red" };

        println!(
            " {} [{}] {} - {} {} ({}ms)",
            symbol.color(color),
            index + 1,
            result.name,
            result.method.to_string().cyan(),
            result.url,
            result.elapsed_ms
        );

        // verbose 模式或失败时显示响应
        if self.verbose || !result.passed {
            for line in self.formatter.format(result).lines() {
                println!("   {}", line);
            }
            println!();
        }

        if !result.outcomes.is_empty() {
            println!("   Assertions:");
            for outcome in &result.outcomes {
                let raw = format!("{} {}", outcome.target, outcome.expected);
                if outcome.passed {
                    println!("     {} {}", "✓".green(), raw);
                } else {
                    println!("     {} {}", "✗".red(), raw);
                    if let Some(msg) = &outcome.message {
                        println!("       {}", msg.red());
                    }
                }
            }
            println!();
        }
    }

    /// 打印执行开始
    pub fn print_header(&self, source: &str, total: usize) {
        println!("\nRunning {} scenarios from {}...\n", total, source.bold());
    }

    /// 打印结果表格与摘要
    pub fn print_summary(&self, reports: &[ScenarioReport], summary: &RunSummary) {
        println!("{}", summary_table(reports));

        let mut parts = vec![format!("{} passed", summary.passed.to_string().green())];
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed.to_string().red()));
        }
        if summary.errored > 0 {
            parts.push(format!("{} aborted", summary.errored.to_string().yellow()));
        }
        parts.push(format!("{} total", summary.total));
        println!("  {}: {}", "Scenarios".bold(), parts.join(", "));

        if summary.total_assertions > 0 {
            if summary.failed_assertions == 0 {
                println!(
                    "  {}: {} passed, {} total",
                    "Assertions".bold(),
                    summary.passed_assertions.to_string().green(),
                    summary.total_assertions
                );
            } else {
                println!(
                    "  {}: {} passed, {} failed, {} total",
                    "Assertions".bold(),
                    summary.passed_assertions.to_string().green(),
                    summary.failed_assertions.to_string().red(),
                    summary.total_assertions
                );
            }
        }

        println!(
            "  {}: {:.3}s",
            "Duration".bold(),
            summary.total_duration_ms as f64 / 1000.0
        );
        println!();
    }

    /// 以 JSON 输出全部结果
    pub fn print_json(
        &self,
        reports: &[ScenarioReport],
        summary: &RunSummary,
    ) -> serde_json::Result<()> {
        println!("{}", render_json(reports, summary)?);
        Ok(())
    }
}

impl Default for ScenarioReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    scenarios: Vec<JsonScenario<'a>>,
    summary: &'a RunSummary,
}

#[derive(Serialize)]
struct JsonScenario<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a crate::runner::ScenarioResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn render_json(reports: &[ScenarioReport], summary: &RunSummary) -> serde_json::Result<String> {
    let report = JsonReport {
        scenarios: reports
            .iter()
            .map(|r| JsonScenario {
                name: &r.name,
                result: r.result(),
                error: r.error().map(|e| e.to_string()),
            })
            .collect(),
        summary,
    };
    serde_json::to_string_pretty(&report)
}

pub fn summary_table(reports: &[ScenarioReport]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Scenario", "Status", "Time", "Assertions", "Result"]);

    for (index, report) in reports.iter().enumerate() {
        match &report.outcome {
            Ok(result) => {
                let passed = result.outcomes.iter().filter(|o| o.passed).count();
                let (label, color) = if result.passed {
                    ("PASS", Color::Green)
                } else {
                    ("FAIL", Color::Red)
                };
                table.add_row(vec![
                    Cell::new(index + 1),
                    Cell::new(&result.name),
                    Cell::new(result.status),
                    Cell::new(format!("{}ms", result.elapsed_ms)),
                    Cell::new(format!("{}/{}", passed, result.outcomes.len())),
                    Cell::new(label).fg(color).add_attribute(Attribute::Bold),
                ]);
            }
            Err(_) => {
                table.add_row(vec![
                    Cell::new(index + 1),
                    Cell::new(&report.name),
                    Cell::new("-").add_attribute(Attribute::Dim),
                    Cell::new("-").add_attribute(Attribute::Dim),
                    Cell::new("-").add_attribute(Attribute::Dim),
                    Cell::new("ERROR").fg(Color::Yellow).add_attribute(Attribute::Bold),
                ]);
            }
        }
    }

    table
}
