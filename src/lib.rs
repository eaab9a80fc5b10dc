//! # OpenRouter Stats
//!
//! 对话补全管道的请求/响应钩子：请求发出前要求上游返回用量明细并开始计时，
//! 响应完成后统计 token、耗时、吞吐、费用和剩余额度，并通过宿主提供的
//! 状态通知接口展示一行状态栏。
//!
//! ```no_run
//! use openrouter_stats::{FilterConfig, ModelDescriptor, StatsFilter, status::ChannelEmitter};
//! use serde_json::json;
//!
//! # async fn run() {
//! let filter = StatsFilter::new(FilterConfig::default());
//! let model = ModelDescriptor::new("anthropic/claude-3.5-sonnet", Some(json!({})));
//! let (request, turn) = filter.tag(json!({"messages": []}), Some(&model));
//! // ... 宿主发送 request 并把 usage 挂到最后一条消息上 ...
//! # let _ = request;
//! let (emitter, mut rx) = ChannelEmitter::channel();
//! let response = json!({"messages": [{"usage": {"total_tokens": 42, "cost": 0.0001}}]});
//! filter.report(response, Some(&turn), Some(&emitter)).await;
//! while let Ok(event) = rx.try_recv() {
//!     println!("{}", event.description());
//! }
//! # }
//! ```

pub mod collect;
pub mod config;
pub mod credits;
pub mod error;
pub mod filter;
pub mod logging;
pub mod status;
pub mod types;

// Re-export commonly used types
pub use config::FilterConfig;
pub use error::{Result, StatsError};
pub use filter::StatsFilter;
pub use types::{ModelDescriptor, TurnContext};
