//! Collect 模块聚合
//!
//! 请求侧打标与响应侧用量解析。

pub mod tagger;
pub mod usage;

pub use tagger::{supports_detailed_usage, tag};
pub use usage::UsageRecord;
