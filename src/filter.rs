//! # 用量统计插件入口
//!
//! 宿主在每轮对话中依次调用：
//! 1. [`StatsFilter::tag`]：请求发出前打标并开始计时；
//! 2. [`StatsFilter::report`]：响应完成后统计、查询余额并推送状态栏。
//!
//! 轮次状态保存在 [`TurnContext`] 中由调用方传递，插件实例本身只读，
//! 可以在多个并发轮次之间共享。

use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::collect::{self, UsageRecord};
use crate::config::FilterConfig;
use crate::credits::{CreditSnapshot, CreditsClient, CreditsProvider};
use crate::logging::{LogComponent, LogStage};
use crate::status::{COMPUTING_DESCRIPTION, StatusEmitter, StatusEvent, TurnStats, render_status};
use crate::types::{ModelDescriptor, TurnContext};
use crate::{ldebug, linfo, lwarn};

/// 用量统计插件
#[derive(Clone)]
pub struct StatsFilter {
    config: FilterConfig,
    credits: Arc<dyn CreditsProvider>,
}

impl std::fmt::Debug for StatsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsFilter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StatsFilter {
    /// 使用 OpenRouter 余额接口创建插件
    #[must_use]
    pub fn new(config: FilterConfig) -> Self {
        Self::with_credits_provider(config, Arc::new(CreditsClient::new()))
    }

    /// 使用自定义余额来源创建插件
    #[must_use]
    pub fn with_credits_provider(config: FilterConfig, credits: Arc<dyn CreditsProvider>) -> Self {
        Self { config, credits }
    }

    #[must_use]
    pub const fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// 请求发出前调用
    #[must_use]
    pub fn tag(&self, body: Value, model: Option<&ModelDescriptor>) -> (Value, TurnContext) {
        collect::tag(body, model)
    }

    /// 响应完成后调用，原样返回响应信封
    ///
    /// 没有 `emitter` 时跳过通知，但统计与余额查询照常进行。
    /// 任何失败都只记录日志，不会影响宿主。
    pub async fn report(
        &self,
        envelope: Value,
        turn: Option<&TurnContext>,
        emitter: Option<&dyn StatusEmitter>,
    ) -> Value {
        let turn_id = turn.map_or_else(Uuid::nil, |t| t.turn_id);

        if let Some(emitter) = emitter {
            Self::emit(emitter, StatusEvent::in_progress(COMPUTING_DESCRIPTION), turn_id).await;
        }

        let stats = self.collect_stats(&envelope, turn).await;
        let description = render_status(&self.config, &stats);

        linfo!(
            turn_id,
            LogStage::Outlet,
            LogComponent::Reporter,
            "turn_stats",
            &description,
            total_tokens = stats.usage.total_tokens,
            cost = stats.usage.cost,
            elapsed_ms = u64::try_from(stats.elapsed.as_millis()).unwrap_or(u64::MAX),
            detailed_usage = turn.is_some_and(|t| t.detailed_usage),
            balance_available = stats.balance.is_some()
        );

        if let Some(emitter) = emitter {
            Self::emit(emitter, StatusEvent::done(description), turn_id).await;
        }

        envelope
    }

    /// 计算本轮统计（含余额查询），不发送通知
    pub async fn collect_stats(&self, envelope: &Value, turn: Option<&TurnContext>) -> TurnStats {
        let usage = UsageRecord::from_envelope(envelope);

        let elapsed = if let Some(turn) = turn {
            turn.elapsed_at(Instant::now())
        } else {
            lwarn!(
                Uuid::nil(),
                LogStage::Outlet,
                LogComponent::Reporter,
                "missing_turn_context",
                "Report called without a tagged turn, elapsed time treated as zero"
            );
            Duration::ZERO
        };

        let turn_id = turn.map_or_else(Uuid::nil, |t| t.turn_id);
        let balance = self.lookup_balance(turn_id).await;

        TurnStats::new(usage, elapsed, balance)
    }

    async fn lookup_balance(&self, turn_id: Uuid) -> Option<CreditSnapshot> {
        let Some(api_key) = self.config.credential() else {
            ldebug!(
                turn_id,
                LogStage::ExternalApi,
                LogComponent::Credits,
                "credits_skipped",
                "No API key configured, skipping credits lookup"
            );
            return None;
        };

        match self.credits.fetch_credits(api_key, turn_id).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                lwarn!(
                    turn_id,
                    LogStage::ExternalApi,
                    LogComponent::Credits,
                    "credits_lookup_failed",
                    &format!("Credits lookup failed: {err}"),
                    category = ?err.category()
                );
                None
            }
        }
    }

    async fn emit(emitter: &dyn StatusEmitter, event: StatusEvent, turn_id: Uuid) {
        let done = event.is_done();
        if let Err(err) = emitter.notify(event).await {
            lwarn!(
                turn_id,
                LogStage::Outlet,
                LogComponent::Emitter,
                "status_emit_failed",
                &format!("Failed to emit status: {err}"),
                done = done
            );
        }
    }
}
