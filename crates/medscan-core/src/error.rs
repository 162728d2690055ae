//! 错误定义模块

use thiserror::Error;

/// 分析核心统一错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MedscanError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无效进度值: {0} (允许范围 0..=100)")]
    InvalidProgressValue(i32),

    #[error("无效状态转换: 从 {from} 到 {event}")]
    InvalidStateTransition { from: String, event: String },
}

/// 统一结果类型
pub type Result<T> = std::result::Result<T, MedscanError>;
