use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use apicheck::config::{ConfigLoader, RunSettings, SuiteConfig};
use apicheck::runner::{RunSummary, ScenarioReporter, ScenarioRunner};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 执行套件中的所有场景
    Run(RunArgs),
    /// 只解析并校验套件，不发送请求
    Check(SuiteArgs),
}

#[derive(Args)]
pub struct SuiteArgs {
    /// 套件文件路径，缺省时查找 apicheck.toml
    pub suite: Option<PathBuf>,

    /// 使用套件中定义的环境
    #[arg(long)]
    pub env: Option<String>,

    /// 覆盖 base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub suite: SuiteArgs,

    /// 每次请求的超时（毫秒）
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// 同时执行的场景数
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// 显示每个场景的响应
    #[arg(short, long)]
    pub verbose: bool,

    /// 以 JSON 输出结果
    #[arg(long)]
    pub json: bool,
}

/// 执行命令，返回是否全部通过
pub async fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Run(args) => run_suite(args).await,
        Commands::Check(args) => check_suite(args),
    }
}

fn load(args: &SuiteArgs) -> Result<(PathBuf, SuiteConfig, RunSettings)> {
    let path = match &args.suite {
        Some(path) => path.clone(),
        None => ConfigLoader::find_suite()
            .ok_or_else(|| anyhow!("No {} found", ConfigLoader::CONFIG_FILE))?,
    };
    let config = ConfigLoader::load_from_path(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let settings =
        ConfigLoader::resolve_settings(&config, args.env.as_deref(), args.base_url.as_deref())?;
    Ok((path, config, settings))
}

async fn run_suite(args: RunArgs) -> Result<bool> {
    let (path, config, settings) = load(&args.suite)?;
    let scenarios = ConfigLoader::build_scenarios(&config, &settings)?;

    let runner = ScenarioRunner::new()
        .with_timeout(
            args.timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(settings.timeout),
        )
        .with_concurrency(args.concurrency.unwrap_or(settings.concurrency))
        .with_capture_body(args.verbose);
    let reporter = ScenarioReporter::new(args.verbose);

    if !args.json {
        reporter.print_header(&path.display().to_string(), scenarios.len());
    }

    let start = Instant::now();
    let reports = runner.run_all(scenarios).await;
    let summary = RunSummary::from_reports(&reports, start.elapsed());

    if args.json {
        reporter.print_json(&reports, &summary)?;
    } else {
        for (index, report) in reports.iter().enumerate() {
            reporter.print_report(index, report);
        }
        reporter.print_summary(&reports, &summary);
    }

    Ok(summary.all_passed())
}

fn check_suite(args: SuiteArgs) -> Result<bool> {
    let (path, config, settings) = load(&args)?;
    let scenarios = ConfigLoader::build_scenarios(&config, &settings)?;

    let mut valid = true;
    for scenario in &scenarios {
        match scenario.request().build() {
            Ok(request) => println!(
                " {} {} - {} {} ({} assertions)",
                "✓".green(),
                scenario.name(),
                request.method().to_string().cyan(),
                request.url(),
                scenario.assertions().len()
            ),
            Err(e) => {
                valid = false;
                println!(" {} {} - {}", "✗".red(), scenario.name(), e.to_string().red());
            }
        }
    }

    println!(
        "\n{} scenarios checked in {}",
        scenarios.len(),
        path.display().to_string().bold()
    );
    Ok(valid)
}
