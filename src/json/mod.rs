/// JSON 提取模块 - 在响应 JSON 树上解析路径表达式
mod extract;
mod path;

pub use extract::{ExtractionError, evaluate, type_name};
pub use path::{PathExpression, PathSyntaxError, Segment};
