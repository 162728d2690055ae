//! 外壳配置加载
//!
//! 依次叠加默认值、可选的配置文件和 `MEDSCAN__` 前缀的环境变量。

use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use medscan_analysis::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 默认配置文件名，不存在时忽略
pub const DEFAULT_CONFIG_FILE: &str = "medscan.toml";

/// 外壳完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShellConfig {
    /// 分析参数
    pub analysis: AnalysisConfig,
    /// 报告导出
    pub export: ExportConfig,
    /// 日志
    pub logging: LoggingConfig,
}

/// 报告导出配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    /// 未指定导出路径时使用的目录
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter 语法的日志级别
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ShellConfig {
    /// 加载配置。显式给出的文件必须存在，默认文件可以缺失。
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// 与 `load` 相同，但可以用给定的变量表代替进程环境
    pub fn load_with_env(path: Option<&str>, env: Option<Map<String, String>>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("MEDSCAN")
                    .separator("__")
                    .source(env),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: ShellConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis
            .validate()
            .context("Invalid analysis configuration")?;
        Ok(())
    }
}
