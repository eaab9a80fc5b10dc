//! # 错误类型定义

use thiserror::Error;

/// 插件主要错误类型
#[derive(Debug, Error)]
pub enum StatsError {
    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 网络通信错误（连接失败、超时等）
    #[error("网络错误: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 上游返回非 2xx 状态码
    #[error("上游状态异常: {message} (HTTP {status})")]
    UpstreamStatus { message: String, status: u16 },

    /// 序列化/反序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// 状态通知发送失败
    #[error("状态通知错误: {message}")]
    Emitter {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO相关错误
    #[error("IO错误: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// 带上下文的错误
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<StatsError>,
    },
}

impl StatsError {
    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建网络错误
    pub fn network<T: Into<String>>(message: T) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的网络错误
    pub fn network_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建上游状态错误
    pub fn upstream_status<T: Into<String>>(message: T, status: u16) -> Self {
        Self::UpstreamStatus {
            message: message.into(),
            status,
        }
    }

    /// 创建带来源的序列化错误
    pub fn serialization_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Serialization {
            message: message.into(),
            source: source.into(),
        }
    }

    /// 创建状态通知错误
    pub fn emitter<T: Into<String>>(message: T) -> Self {
        Self::Emitter {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的状态通知错误
    pub fn emitter_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Emitter {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 错误分类，供日志与告警使用
    #[must_use]
    pub fn category(&self) -> super::ErrorCategory {
        match self {
            Self::Config { .. } | Self::Serialization { .. } | Self::Io { .. } => {
                super::ErrorCategory::Local
            }
            Self::Network { .. } | Self::UpstreamStatus { .. } => super::ErrorCategory::Upstream,
            Self::Emitter { .. } => super::ErrorCategory::Host,
            Self::Context { source, .. } => source.category(),
        }
    }
}

// 自动转换常见错误类型
impl From<std::io::Error> for StatsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: "文件操作失败".to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for StatsError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML解析失败", err)
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_with_source("JSON处理失败", err)
    }
}

// Reqwest错误转换：超时单独标注，便于排查
impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("HTTP请求超时", err)
        } else if err.is_decode() {
            Self::serialization_with_source("HTTP响应解析失败", err)
        } else {
            Self::network_with_source("HTTP请求失败", err)
        }
    }
}
