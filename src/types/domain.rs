use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub type TokenCount = u64;

pub type CostValue = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeoutSeconds(pub u64);

impl TimeoutSeconds {
    #[must_use]
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl fmt::Display for TimeoutSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// 宿主为本轮提供的模型描述
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// 模型标识，如 `anthropic/claude-3.5-sonnet`
    #[serde(default)]
    pub id: String,
    /// 上游首选提供商信息；JSON `null` 视为不存在
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_provider: Option<Value>,
}

impl ModelDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>, top_provider: Option<Value>) -> Self {
        Self {
            id: id.into(),
            top_provider,
        }
    }

    /// 宽松解析宿主传入的 JSON，结构不符时返回 `None`
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// 模型标识是否带有提供商命名空间（`vendor/model`）
    #[must_use]
    pub fn is_namespaced(&self) -> bool {
        self.id.contains('/')
    }

    /// 是否存在首选提供商信息
    #[must_use]
    pub fn has_top_provider(&self) -> bool {
        self.top_provider.as_ref().is_some_and(|v| !v.is_null())
    }
}

/// 单轮对话的状态，由打标阶段创建并交给上报阶段
///
/// 状态随调用参数传递而不是保存在插件实例上，同一实例可以并发服务多个轮次。
#[derive(Debug, Clone)]
pub struct TurnContext {
    /// 日志关联 ID
    pub turn_id: Uuid,
    /// 打标时刻
    pub started_at: Instant,
    /// 本轮是否请求了详细用量统计
    pub detailed_usage: bool,
}

impl TurnContext {
    /// 以当前时刻开始一轮
    #[must_use]
    pub fn start(detailed_usage: bool) -> Self {
        Self::started_at(Instant::now(), detailed_usage)
    }

    #[must_use]
    pub fn started_at(started_at: Instant, detailed_usage: bool) -> Self {
        Self {
            turn_id: Uuid::new_v4(),
            started_at,
            detailed_usage,
        }
    }

    /// 到 `now` 为止的耗时；`now` 早于开始时刻时为零
    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }
}
