//! # 插件配置结构定义

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::path::Path;

use crate::error::{Context, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{ensure_config, ldebug};

/// 宿主模板中未填写密钥时的占位值
const PLACEHOLDER_KEY: &str = "ENTER_KEY";

/// 环境变量：余额查询密钥
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";

/// 布尔开关的环境变量前缀
const ENV_TOGGLE_PREFIX: &str = "OPENROUTER_STATS_";

/// 插件配置
///
/// 每个插件实例激活时构造一次，之后只读。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// 余额查询使用的 API 密钥，为空时不查询
    #[serde(alias = "credential")]
    pub openrouter_api_key: String,
    /// 显示 token 总数
    pub show_total_tokens: bool,
    /// 显示耗时
    pub show_elapsed_time: bool,
    /// 显示吞吐量
    pub show_tokens_per_sec: bool,
    /// 余额后附带充值总额
    pub show_base_credits: bool,
    /// 各段前加表情符号
    pub show_emojis: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: String::new(),
            show_total_tokens: true,
            show_elapsed_time: true,
            show_tokens_per_sec: true,
            show_base_credits: true,
            show_emojis: true,
        }
    }
}

// 密钥不进日志
impl fmt::Debug for FilterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.openrouter_api_key.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("FilterConfig")
            .field("openrouter_api_key", &key)
            .field("show_total_tokens", &self.show_total_tokens)
            .field("show_elapsed_time", &self.show_elapsed_time)
            .field("show_tokens_per_sec", &self.show_tokens_per_sec)
            .field("show_base_credits", &self.show_base_credits)
            .field("show_emojis", &self.show_emojis)
            .finish()
    }
}

impl FilterConfig {
    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载，随后应用环境变量覆盖
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// 应用进程环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env_overrides_with(|name| std::env::var(name).ok())
    }

    /// 通过查找函数应用覆盖，`lookup` 返回 `None` 表示未设置
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0_usize;

        if let Some(key) = lookup(ENV_API_KEY) {
            self.openrouter_api_key = key;
            applied += 1;
        }

        for (suffix, slot) in [
            ("SHOW_TOTAL_TOKENS", &mut self.show_total_tokens),
            ("SHOW_ELAPSED_TIME", &mut self.show_elapsed_time),
            ("SHOW_TOKENS_PER_SEC", &mut self.show_tokens_per_sec),
            ("SHOW_BASE_CREDITS", &mut self.show_base_credits),
            ("SHOW_EMOJIS", &mut self.show_emojis),
        ] {
            let name = format!("{ENV_TOGGLE_PREFIX}{suffix}");
            if let Some(raw) = lookup(&name) {
                *slot = parse_bool(&name, &raw)?;
                applied += 1;
            }
        }

        ldebug!(
            "config",
            LogStage::Internal,
            LogComponent::Config,
            "env_overrides",
            "Applied environment overrides",
            applied = applied
        );

        self.validate()
    }

    /// 校验配置：密钥需能放进 HTTP 头
    pub fn validate(&self) -> Result<()> {
        ensure_config!(
            !self
                .openrouter_api_key
                .trim()
                .chars()
                .any(|c| c.is_whitespace() || c.is_control()),
            "openrouter_api_key 不能包含空白或控制字符"
        );
        Ok(())
    }

    /// 已配置的余额查询密钥；空值或占位值视为未配置
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        let key = self.openrouter_api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_KEY {
            None
        } else {
            Some(key)
        }
    }

    /// 配置项描述，供宿主渲染设置界面
    #[must_use]
    pub fn schema() -> Value {
        let defaults = Self::default();
        json!([
            {
                "name": "openrouter_api_key",
                "type": "string",
                "default": defaults.openrouter_api_key,
                "description": "API key for OpenRouter API"
            },
            {
                "name": "show_total_tokens",
                "type": "bool",
                "default": defaults.show_total_tokens,
                "description": "Show total token count"
            },
            {
                "name": "show_elapsed_time",
                "type": "bool",
                "default": defaults.show_elapsed_time,
                "description": "Show elapsed time"
            },
            {
                "name": "show_tokens_per_sec",
                "type": "bool",
                "default": defaults.show_tokens_per_sec,
                "description": "Show tokens per second"
            },
            {
                "name": "show_base_credits",
                "type": "bool",
                "default": defaults.show_base_credits,
                "description": "Show total purchased credits next to the remaining balance"
            },
            {
                "name": "show_emojis",
                "type": "bool",
                "default": defaults.show_emojis,
                "description": "Prefix status segments with emojis"
            }
        ])
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(crate::config_error!("环境变量 {} 的值无效: {}", name, other)),
    }
}
