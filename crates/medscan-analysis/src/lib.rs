//! # MedScan 分析模块
//!
//! 模拟影像分析的核心组件，包括：
//! - 进度模拟：按区段随机推进 0-100 的分析进度
//! - 结果抽样：随机生成损伤、置信度、部位和建议
//! - 报告模板：由分析结果生成确定性的诊断报告文本
//! - 会话状态机：约束一次分析从选择患者到完成的合法转换
//! - 定时驱动：以固定间隔推进会话并支持中止重启

pub mod config;
pub mod driver;
pub mod progress;
pub mod report;
pub mod sampler;
pub mod session;
pub mod state_machine;

// 重新导出主要类型
pub use config::AnalysisConfig;
pub use driver::AnalysisDriver;
pub use progress::{ProgressBand, ProgressSimulator, ProgressTick};
pub use report::{describe_damage, ReportTemplateEngine};
pub use sampler::AnalysisOutcomeSampler;
pub use session::AnalysisSession;
pub use state_machine::{SessionEvent, SessionState, SessionStateMachine};
