//! 响应侧用量解析
//!
//! 宿主把上游返回的用量挂在消息列表最后一条的 `usage` 字段上。

use serde_json::Value;

use crate::types::{CostValue, TokenCount};

/// 单轮用量记录，缺失字段一律为零
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageRecord {
    pub total_tokens: TokenCount,
    pub cost: CostValue,
}

impl UsageRecord {
    /// 从响应信封中提取用量
    #[must_use]
    pub fn from_envelope(envelope: &Value) -> Self {
        envelope
            .get("messages")
            .and_then(Value::as_array)
            .and_then(|messages| messages.last())
            .and_then(|last| last.get("usage"))
            .map_or_else(Self::default, Self::from_usage)
    }

    /// 从 `usage` 对象中提取用量
    #[must_use]
    pub fn from_usage(usage: &Value) -> Self {
        Self {
            total_tokens: usage.get("total_tokens").map_or(0, token_count),
            cost: usage.get("cost").map_or(0.0, cost_value),
        }
    }

    /// 费用是否需要展示
    #[must_use]
    pub fn has_cost(&self) -> bool {
        self.cost != 0.0
    }
}

// 部分上游把 token 数写成浮点
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn token_count(value: &Value) -> TokenCount {
    if let Some(n) = value.as_u64() {
        return n;
    }
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n > 0.0)
        .map_or(0, |n| n as TokenCount)
}

fn cost_value(value: &Value) -> CostValue {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}
