//! # 状态通知
//!
//! 宿主提供的状态栏通过 [`StatusEmitter`] 注入，每次上报调用单独传入。

pub mod segments;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{Result, StatsError};

pub use segments::{SegmentKind, TurnStats, render_segment, render_status};

/// 计算中提示文本
pub const COMPUTING_DESCRIPTION: &str = "Computing total costs...";

/// 状态通知负载
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusData {
    pub description: String,
    pub done: bool,
}

/// 发送给宿主的事件，序列化为 `{"type":"status","data":{...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StatusEvent {
    /// 状态栏更新
    Status(StatusData),
}

impl StatusEvent {
    /// 未完成的状态
    #[must_use]
    pub fn in_progress(description: impl Into<String>) -> Self {
        Self::Status(StatusData {
            description: description.into(),
            done: false,
        })
    }

    /// 最终状态
    #[must_use]
    pub fn done(description: impl Into<String>) -> Self {
        Self::Status(StatusData {
            description: description.into(),
            done: true,
        })
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Status(data) => &data.description,
        }
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        match self {
            Self::Status(data) => data.done,
        }
    }
}

/// 宿主的状态通知能力
#[async_trait]
pub trait StatusEmitter: Send + Sync {
    /// 推送一条状态事件
    async fn notify(&self, event: StatusEvent) -> Result<()>;
}

/// 把事件转发到 tokio 通道的发送器
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl ChannelEmitter {
    #[must_use]
    pub const fn new(tx: mpsc::UnboundedSender<StatusEvent>) -> Self {
        Self { tx }
    }

    /// 创建发送器及对应的接收端
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StatusEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl StatusEmitter for ChannelEmitter {
    async fn notify(&self, event: StatusEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|err| StatsError::emitter_with_source("status receiver dropped", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn event_wire_shape() {
        let event = StatusEvent::in_progress(COMPUTING_DESCRIPTION);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "status", "data": {"description": "Computing total costs...", "done": false}})
        );

        let parsed: StatusEvent = serde_json::from_value(
            json!({"type": "status", "data": {"description": "x", "done": true}}),
        )
        .unwrap();
        assert_eq!(parsed, StatusEvent::done("x"));
        assert!(parsed.is_done());
    }

    #[tokio::test]
    async fn channel_emitter_forwards_events() {
        let (emitter, mut rx) = ChannelEmitter::channel();
        emitter.notify(StatusEvent::done("ok")).await.unwrap();
        assert_eq!(rx.recv().await, Some(StatusEvent::done("ok")));
    }

    #[tokio::test]
    async fn channel_emitter_reports_dropped_receiver() {
        let (emitter, rx) = ChannelEmitter::channel();
        drop(rx);
        let err = emitter.notify(StatusEvent::done("lost")).await.unwrap_err();
        assert!(matches!(err, StatsError::Emitter { .. }));
    }
}
