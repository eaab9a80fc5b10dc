//! # 日志配置模块
//!
//! 提供按阶段/组件划分的结构化日志宏，以及宿主可选调用的订阅器初始化。
//!
//! 所有宏的前五个参数依次为：关联 ID（通常是 `turn_id`）、[`LogStage`]、
//! [`LogComponent`]、操作名、消息文本；之后可追加任意 `tracing` 字段。

use std::env;
use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 一次对话轮次内的处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    /// 请求发出前（打标）
    Inlet,
    /// 响应完成后（统计与上报）
    Outlet,
    /// 调用外部 API
    ExternalApi,
    /// 内部处理
    Internal,
}

impl LogStage {
    /// 日志中使用的短名称
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inlet => "inlet",
            Self::Outlet => "outlet",
            Self::ExternalApi => "external_api",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    /// 请求打标
    Tagger,
    /// 用量上报
    Reporter,
    /// 余额查询客户端
    Credits,
    /// 状态通知
    Emitter,
    /// 配置加载
    Config,
}

impl LogComponent {
    /// 日志中使用的短名称
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tagger => "tagger",
            Self::Reporter => "reporter",
            Self::Credits => "credits",
            Self::Emitter => "emitter",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DEBUG 级别结构化日志
#[macro_export]
macro_rules! ldebug {
    ($id:expr, $stage:expr, $component:expr, $op:expr, $msg:expr $(, $($fields:tt)+)?) => {
        ::tracing::debug!(
            turn_id = %$id,
            stage = %$stage,
            component = %$component,
            operation = $op
            $(, $($fields)+)?,
            "{}",
            $msg
        )
    };
}

/// INFO 级别结构化日志
#[macro_export]
macro_rules! linfo {
    ($id:expr, $stage:expr, $component:expr, $op:expr, $msg:expr $(, $($fields:tt)+)?) => {
        ::tracing::info!(
            turn_id = %$id,
            stage = %$stage,
            component = %$component,
            operation = $op
            $(, $($fields)+)?,
            "{}",
            $msg
        )
    };
}

/// WARN 级别结构化日志
#[macro_export]
macro_rules! lwarn {
    ($id:expr, $stage:expr, $component:expr, $op:expr, $msg:expr $(, $($fields:tt)+)?) => {
        ::tracing::warn!(
            turn_id = %$id,
            stage = %$stage,
            component = %$component,
            operation = $op
            $(, $($fields)+)?,
            "{}",
            $msg
        )
    };
}

/// ERROR 级别结构化日志
#[macro_export]
macro_rules! lerror {
    ($id:expr, $stage:expr, $component:expr, $op:expr, $msg:expr $(, $($fields:tt)+)?) => {
        ::tracing::error!(
            turn_id = %$id,
            stage = %$stage,
            component = %$component,
            operation = $op
            $(, $($fields)+)?,
            "{}",
            $msg
        )
    };
}

/// 初始化日志系统
///
/// 宿主通常已经安装了自己的订阅器，此时调用不会覆盖它。
/// `RUST_LOG` 存在时优先使用。
pub fn init_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let default_filter = format!("{level},openrouter_stats=debug,reqwest=warn,hyper=warn");
    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(
            tfmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("📋 openrouter-stats logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_and_component_names() {
        assert_eq!(LogStage::ExternalApi.to_string(), "external_api");
        assert_eq!(LogComponent::Credits.to_string(), "credits");
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(Some("debug"));
        init_logging(None);
        crate::linfo!(
            "test",
            LogStage::Internal,
            LogComponent::Config,
            "init_twice",
            "second init did not panic",
            attempts = 2
        );
    }
}
