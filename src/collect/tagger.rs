//! 请求侧打标
//!
//! 对带命名空间且有首选提供商信息的模型，在请求体中加入
//! `"usage": {"include": true}`，让上游在响应中返回 token 与费用明细。

use serde_json::{Map, Value};

use crate::ldebug;
use crate::logging::{LogComponent, LogStage};
use crate::types::{ModelDescriptor, TurnContext};

/// 请求体中的用量开关字段
const USAGE_FIELD: &str = "usage";
const USAGE_INCLUDE_FIELD: &str = "include";

/// 判断本轮是否可以请求详细用量
#[must_use]
pub fn supports_detailed_usage(model: Option<&ModelDescriptor>) -> bool {
    model.is_some_and(|m| m.is_namespaced() && m.has_top_provider())
}

/// 打标并开始计时
///
/// 无论是否注入用量开关都会记录开始时刻。非对象请求体原样返回。
#[must_use]
pub fn tag(mut body: Value, model: Option<&ModelDescriptor>) -> (Value, TurnContext) {
    let mut detailed_usage = supports_detailed_usage(model);

    if detailed_usage {
        if let Some(obj) = body.as_object_mut() {
            include_usage(obj);
        } else {
            detailed_usage = false;
        }
    }

    let turn = TurnContext::start(detailed_usage);
    ldebug!(
        turn.turn_id,
        LogStage::Inlet,
        LogComponent::Tagger,
        "tag_request",
        "Request tagged",
        model = model.map_or("<none>", |m| m.id.as_str()),
        detailed_usage = detailed_usage
    );
    (body, turn)
}

// 已有 usage 对象时合并，保留宿主设置的其他字段
fn include_usage(obj: &mut Map<String, Value>) {
    let usage = obj
        .entry(USAGE_FIELD)
        .or_insert_with(|| Value::Object(Map::new()));
    if !usage.is_object() {
        *usage = Value::Object(Map::new());
    }
    if let Some(usage) = usage.as_object_mut() {
        usage.insert(USAGE_INCLUDE_FIELD.to_string(), Value::Bool(true));
    }
}
