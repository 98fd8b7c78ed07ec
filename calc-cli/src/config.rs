//! # Config 模块
//!
//! 命令行宿主的配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (calc.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::{Path, PathBuf};

use calc_core::AngleMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

/// 命令行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// 初始角度模式（rad/deg）
    #[serde(default)]
    pub angle_mode: AngleMode,

    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// REPL 提示符，仅在终端交互时输出
    #[serde(default = "default_repl_prompt")]
    pub repl_prompt: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_repl_prompt() -> String {
    "> ".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            angle_mode: AngleMode::default(),
            log_level: default_log_level(),
            repl_prompt: default_repl_prompt(),
        }
    }
}

impl CliConfig {
    /// 加载并验证配置文件
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_log_level(&self.log_level)?;
        Ok(())
    }
}

/// 解析日志级别，大小写不敏感
pub fn parse_log_level(level: &str) -> Result<Level, ConfigError> {
    level
        .parse::<Level>()
        .map_err(|_| ConfigError::ValidationFailed(format!("未知的日志级别: '{}'", level)))
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件不存在
    #[error("配置文件不存在: {}", .0.display())]
    NotFound(PathBuf),

    /// IO 错误
    #[error("配置 IO 错误 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON 解析或序列化失败
    #[error("配置解析失败 ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
