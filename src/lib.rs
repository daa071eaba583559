pub mod assertion;
pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod logger;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use assertion::{Assertion, AssertionChain, AssertionOutcome, CompareOp, Expected, Target};
pub use error::{ApicheckError, ConfigError, Result, TransportError};
pub use http::{Client, Method, RequestBuilder, RequestDescriptor, ResponseDescriptor};
pub use json::{ExtractionError, PathExpression};
pub use runner::{RunSummary, Scenario, ScenarioReport, ScenarioResult, ScenarioRunner};
