pub mod loader;
pub mod resolver;
pub mod types;

pub use loader::ConfigLoader;
pub use resolver::resolve_env_vars;
pub use types::{EnvironmentConfig, RunSettings, ScenarioConfig, SuiteConfig};
