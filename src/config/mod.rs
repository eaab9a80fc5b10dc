//! # 配置管理模块
//!
//! 处理插件配置的加载、环境变量覆盖与校验

mod filter_config;

pub use filter_config::{ENV_API_KEY, FilterConfig};

use std::env;
use std::path::Path;

/// 指定配置文件路径的环境变量
pub const ENV_CONFIG_PATH: &str = "OPENROUTER_STATS_CONFIG_PATH";

/// 加载配置
///
/// 若设置了 `OPENROUTER_STATS_CONFIG_PATH` 则从该文件读取，否则使用默认值；
/// 两种情况都会应用环境变量覆盖。
pub fn load_config() -> crate::error::Result<FilterConfig> {
    if let Ok(path) = env::var(ENV_CONFIG_PATH) {
        if !Path::new(&path).exists() {
            return Err(crate::error::StatsError::config(format!(
                "配置文件不存在: {path}"
            )));
        }
        return FilterConfig::from_file(&path);
    }

    let mut config = FilterConfig::default();
    config.apply_env_overrides()?;
    Ok(config)
}
