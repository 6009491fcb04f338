// ==========================================
// 加权槽位调度系统 - 配置管理器
// ==========================================
// 职责: 配置加载（JSON 文件）+ 环境变量覆写 + 校验
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::config::error::ConfigError;
use crate::config::simulation_config::SimulationConfig;
use crate::domain::types::EligibilityPolicy;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// 环境变量键
// ==========================================
pub mod config_keys {
    pub const SEED: &str = "FAIR_SLOT_SEED";
    pub const INTERVALS: &str = "FAIR_SLOT_INTERVALS";
    pub const QUEUES: &str = "FAIR_SLOT_QUEUES";
    pub const POLICY: &str = "FAIR_SLOT_POLICY";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: SimulationConfig,
}

impl ConfigManager {
    /// 以默认配置创建
    pub fn new() -> Self {
        Self {
            config: SimulationConfig::default(),
        }
    }

    /// 从 JSON 文件加载（缺省字段取默认值）
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: SimulationConfig = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.display(), "配置文件已加载");

        Ok(Self { config })
    }

    /// 应用进程环境变量覆写
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = [
            config_keys::SEED,
            config_keys::INTERVALS,
            config_keys::QUEUES,
            config_keys::POLICY,
        ]
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
        .collect();

        self.with_overrides(&vars)
    }

    /// 应用给定键值覆写（键名同环境变量）
    ///
    /// 说明：与进程环境解耦，便于测试。
    pub fn with_overrides(mut self, vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        if let Some(v) = vars.get(config_keys::SEED) {
            self.config.seed = parse_env(config_keys::SEED, v)?;
        }
        if let Some(v) = vars.get(config_keys::INTERVALS) {
            self.config.intervals = parse_env(config_keys::INTERVALS, v)?;
        }
        if let Some(v) = vars.get(config_keys::QUEUES) {
            self.config.queue_count = parse_env(config_keys::QUEUES, v)?;
        }
        if let Some(v) = vars.get(config_keys::POLICY) {
            self.config.policy = v
                .parse::<EligibilityPolicy>()
                .map_err(|message| ConfigError::InvalidEnv {
                    key: config_keys::POLICY.to_string(),
                    value: v.clone(),
                    message,
                })?;
        }
        Ok(self)
    }

    /// 直接修改配置（命令行参数覆写）
    pub fn update(mut self, f: impl FnOnce(&mut SimulationConfig)) -> Self {
        f(&mut self.config);
        self
    }

    /// 校验并输出最终配置
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
}
