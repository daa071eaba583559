pub mod executor;
pub mod reporter;
pub mod scenario;
pub mod types;

pub use executor::ScenarioRunner;
pub use reporter::ScenarioReporter;
pub use scenario::Scenario;
pub use types::{RunSummary, ScenarioReport, ScenarioResult};
