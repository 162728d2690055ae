//! # MedScan Core
//!
//! 模拟影像分析系统的核心模块，提供基础数据结构、错误定义、示例患者数据和通用工具。

pub mod error;
pub mod models;
pub mod registry;
pub mod utils;

pub use error::{MedscanError, Result};
pub use models::*;
pub use registry::PatientRegistry;
