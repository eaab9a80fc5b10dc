//! # OpenRouter 余额查询客户端
//!
//! 每次上报时实时查询一次，不缓存、不重试。失败以 `Err` 返回，
//! 由调用方决定如何降级。

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Result, StatsError};
use crate::logging::{LogComponent, LogStage};
use crate::types::{CostValue, TimeoutSeconds};
use crate::{ldebug, lerror};

/// OpenRouter API 基础URL
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai";

/// 余额接口路径
const CREDITS_PATH: &str = "/api/v1/credits";

/// 请求超时时间
pub const CREDITS_REQUEST_TIMEOUT: TimeoutSeconds = TimeoutSeconds::new(5);

/// 余额快照（不持久化）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditSnapshot {
    /// 累计充值额度
    #[serde(default)]
    pub total_credits: CostValue,
    /// 累计消耗
    #[serde(default)]
    pub total_usage: CostValue,
}

impl CreditSnapshot {
    #[must_use]
    pub const fn new(total_credits: CostValue, total_usage: CostValue) -> Self {
        Self {
            total_credits,
            total_usage,
        }
    }

    /// 剩余额度 = 充值总额 - 累计消耗
    #[must_use]
    pub fn remaining(&self) -> CostValue {
        self.total_credits - self.total_usage
    }
}

/// `GET /api/v1/credits` 响应结构
#[derive(Debug, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    data: CreditSnapshot,
}

/// 余额来源，便于在测试中替换
#[async_trait]
pub trait CreditsProvider: Send + Sync {
    /// 查询当前余额
    async fn fetch_credits(&self, api_key: &str, turn_id: Uuid) -> Result<CreditSnapshot>;
}

/// OpenRouter 余额查询客户端
#[derive(Debug, Clone)]
pub struct CreditsClient {
    http_client: Client,
    base_url: String,
}

impl Default for CreditsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CreditsClient {
    /// 创建指向 OpenRouter 的客户端
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(OPENROUTER_BASE_URL)
    }

    /// 使用自定义base URL创建客户端（主要用于测试）
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        let client = match Client::builder()
            .timeout(CREDITS_REQUEST_TIMEOUT.as_duration())
            .build()
        {
            Ok(client) => client,
            Err(err) => {
                lerror!(
                    "system",
                    LogStage::Internal,
                    LogComponent::Credits,
                    "http_client_build_fail",
                    &format!("构建HTTP客户端失败，将回退到默认客户端: {err}")
                );
                Client::new()
            }
        };

        Self {
            http_client: client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 完整的余额接口地址
    #[must_use]
    pub fn credits_url(&self) -> String {
        format!("{}{CREDITS_PATH}", self.base_url)
    }
}

#[async_trait]
impl CreditsProvider for CreditsClient {
    async fn fetch_credits(&self, api_key: &str, turn_id: Uuid) -> Result<CreditSnapshot> {
        let started = Instant::now();
        // 回退客户端没有超时，这里按请求再设置一次
        let response = self
            .http_client
            .get(self.credits_url())
            .bearer_auth(api_key)
            .timeout(CREDITS_REQUEST_TIMEOUT.as_duration())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::upstream_status(
                "credits lookup rejected",
                status.as_u16(),
            ));
        }

        let body: CreditsResponse = response.json().await?;

        ldebug!(
            turn_id,
            LogStage::ExternalApi,
            LogComponent::Credits,
            "credits_fetched",
            "Credits lookup succeeded",
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            total_credits = body.data.total_credits,
            total_usage = body.data.total_usage
        );
        Ok(body.data)
    }
}
