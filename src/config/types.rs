use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

/// 套件文件（apicheck.toml）
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SuiteConfig {
    /// 默认 base URL，可被环境或命令行覆盖
    pub base_url: Option<String>,

    /// 每次发送的超时（毫秒）
    pub timeout_ms: Option<u64>,

    /// 同时执行的场景数
    pub concurrency: Option<usize>,

    /// 所有场景共享的 header
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,

    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
}

impl SuiteConfig {
    pub fn get_environment(&self, env_name: &str) -> Option<&EnvironmentConfig> {
        self.environments.get(env_name)
    }
}

/// 环境配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EnvironmentConfig {
    pub base_url: Option<String>,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// 单个场景定义
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,

    pub method: String,

    pub path: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// 保持声明顺序；需要重复的 key 时使用 `[["tag", "a"], ["tag", "b"]]`
    #[serde(default, deserialize_with = "deserialize_query")]
    pub query: Vec<(String, String)>,

    /// 任意 TOML 值，按 JSON 发送
    pub body: Option<serde_json::Value>,

    /// 文本断言，如 `$status == 200`
    #[serde(default)]
    pub expect: Vec<String>,
}

/// 解析后的运行参数，显式传给每个场景
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub concurrency: usize,
    pub headers: BTreeMap<String, String>,
}

/// query 既可以写成表 `{ page = "2" }`，也可以写成键值对数组
fn deserialize_query<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct QueryVisitor;

    impl<'de> Visitor<'de> for QueryVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a table of query parameters or an array of [key, value] pairs")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::new();
            while let Some(pair) = map.next_entry::<String, String>()? {
                pairs.push(pair);
            }
            Ok(pairs)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::new();
            while let Some(pair) = seq.next_element::<(String, String)>()? {
                pairs.push(pair);
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_any(QueryVisitor)
}
