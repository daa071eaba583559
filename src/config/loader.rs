use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::assertion::{AssertionChain, parse_assertion};
use crate::config::resolver::resolve_env_vars;
use crate::config::types::{RunSettings, ScenarioConfig, SuiteConfig};
use crate::error::{ApicheckError, ConfigError};
use crate::http::{Method, RequestBuilder};
use crate::runner::{Scenario, ScenarioRunner};
use crate::Result;

/// 套件文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    pub const CONFIG_FILE: &'static str = "apicheck.toml";

    /// 从指定路径加载套件文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<SuiteConfig> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&content)?;
        debug!(path = %path.as_ref().display(), "suite file loaded");
        Ok(config)
    }

    /// 查找套件文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/apicheck/
    pub fn find_suite() -> Option<PathBuf> {
        Self::find_in_ancestors().or_else(Self::find_in_user_dir)
    }

    fn find_in_ancestors() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            // 尝试父目录
            if !current.pop() {
                break;
            }
        }

        None
    }

    fn find_in_user_dir() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("apicheck").join(Self::CONFIG_FILE);
        config_path.exists().then_some(config_path)
    }

    /// 计算运行参数
    /// base URL 优先级：命令行 > 环境 > 套件顶层
    pub fn resolve_settings(
        config: &SuiteConfig,
        env_name: Option<&str>,
        base_url_override: Option<&str>,
    ) -> Result<RunSettings> {
        let env = match env_name {
            Some(name) => Some(config.get_environment(name).ok_or_else(|| {
                ApicheckError::Suite(format!("Unknown environment '{}'", name))
            })?),
            None => None,
        };

        let base_url = base_url_override
            .map(str::to_string)
            .or_else(|| env.and_then(|e| e.base_url.clone()))
            .or_else(|| config.base_url.clone())
            .ok_or(ConfigError::MissingBaseUri)?;

        let mut headers = config.headers.clone();
        if let Some(env) = env {
            headers.extend(env.headers.clone());
        }
        for value in headers.values_mut() {
            *value = resolve_env_vars(value);
        }

        Ok(RunSettings {
            base_url: resolve_env_vars(&base_url),
            timeout: config
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(ScenarioRunner::DEFAULT_TIMEOUT),
            concurrency: config
                .concurrency
                .unwrap_or(ScenarioRunner::DEFAULT_CONCURRENCY),
            headers,
        })
    }

    /// 将套件中的场景定义转换为可执行的场景
    pub fn build_scenarios(config: &SuiteConfig, settings: &RunSettings) -> Result<Vec<Scenario>> {
        config
            .scenarios
            .iter()
            .map(|scenario| Self::build_scenario(scenario, settings))
            .collect()
    }

    fn build_scenario(config: &ScenarioConfig, settings: &RunSettings) -> Result<Scenario> {
        let context = |e: ApicheckError| ApicheckError::Suite(format!("scenario '{}': {}", config.name, e));

        let method: Method = config
            .method
            .parse()
            .map_err(|e: ConfigError| context(e.into()))?;

        let mut request = RequestBuilder::new()
            .method(method)
            .base_uri(settings.base_url.as_str())
            .path(config.path.as_str());

        for (key, value) in &settings.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        for (key, value) in &config.headers {
            request = request.header(key.as_str(), resolve_env_vars(value));
        }
        for (key, value) in &config.query {
            request = request.query(key.as_str(), value.as_str());
        }
        if let Some(body) = &config.body {
            request = request.json_body(body).map_err(|e| context(e.into()))?;
        }

        let assertions = config
            .expect
            .iter()
            .map(|raw| parse_assertion(raw))
            .collect::<std::result::Result<AssertionChain, _>>()
            .map_err(|e| context(e.into()))?;

        Ok(Scenario::new(config.name.clone(), request).with_assertions(assertions))
    }
}
