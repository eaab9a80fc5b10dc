//! 状态栏文本拼装
//!
//! 各段按固定顺序排列：tokens → 耗时 → 吞吐 → 费用 → 余额。
//! 每段由（是否启用，格式化）两部分组成，互不依赖。

use std::time::Duration;

use crate::collect::UsageRecord;
use crate::config::FilterConfig;
use crate::credits::CreditSnapshot;

/// 段之间的分隔符
pub const SEPARATOR: &str = " | ";

/// 一轮结束后用于展示的统计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurnStats {
    pub usage: UsageRecord,
    pub elapsed: Duration,
    /// 余额查询成功时才有值
    pub balance: Option<CreditSnapshot>,
}

impl TurnStats {
    #[must_use]
    pub const fn new(usage: UsageRecord, elapsed: Duration, balance: Option<CreditSnapshot>) -> Self {
        Self {
            usage,
            elapsed,
            balance,
        }
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// 每秒 token 数；耗时为零时为零
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tokens_per_sec(&self) -> f64 {
        let elapsed = self.elapsed_secs();
        if elapsed <= 0.0 {
            return 0.0;
        }
        let rate = self.usage.total_tokens as f64 / elapsed;
        if rate.is_finite() { rate } else { 0.0 }
    }
}

/// 状态栏中的一段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Tokens,
    Elapsed,
    Throughput,
    Cost,
    Balance,
}

impl SegmentKind {
    /// 展示顺序
    pub const ORDER: [Self; 5] = [
        Self::Tokens,
        Self::Elapsed,
        Self::Throughput,
        Self::Cost,
        Self::Balance,
    ];

    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Tokens => "🪙",
            Self::Elapsed => "⏱️",
            Self::Throughput => "⚡",
            Self::Cost => "💸",
            Self::Balance => "💰",
        }
    }

    fn enabled(self, config: &FilterConfig, stats: &TurnStats) -> bool {
        match self {
            Self::Tokens => config.show_total_tokens,
            Self::Elapsed => config.show_elapsed_time,
            Self::Throughput => config.show_tokens_per_sec,
            Self::Cost => stats.usage.has_cost(),
            Self::Balance => stats.balance.is_some(),
        }
    }

    fn format(self, config: &FilterConfig, stats: &TurnStats) -> String {
        match self {
            Self::Tokens => format!("{} Tokens", stats.usage.total_tokens),
            Self::Elapsed => format!("{:.2} s", stats.elapsed_secs()),
            Self::Throughput => format!("{:.2} T/s", stats.tokens_per_sec()),
            Self::Cost => format!("${:.7}", stats.usage.cost),
            Self::Balance => {
                let balance = stats.balance.unwrap_or_default();
                if config.show_base_credits {
                    format!(
                        "${:.7} of ${:.2}",
                        balance.remaining(),
                        balance.total_credits
                    )
                } else {
                    format!("${:.7}", balance.remaining())
                }
            }
        }
    }
}

/// 渲染单段；未启用时返回 `None`
#[must_use]
pub fn render_segment(kind: SegmentKind, config: &FilterConfig, stats: &TurnStats) -> Option<String> {
    if !kind.enabled(config, stats) {
        return None;
    }
    let text = kind.format(config, stats);
    Some(if config.show_emojis {
        format!("{} {text}", kind.glyph())
    } else {
        text
    })
}

/// 拼装完整状态栏；没有启用的段时为空串
#[must_use]
pub fn render_status(config: &FilterConfig, stats: &TurnStats) -> String {
    SegmentKind::ORDER
        .iter()
        .filter_map(|kind| render_segment(*kind, config, stats))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}
