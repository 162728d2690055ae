//! # MedScan
//!
//! 影像模拟分析的门面库，统一导出核心模型与分析组件。

pub use medscan_analysis;
pub use medscan_core;

pub use medscan_analysis::{
    AnalysisDriver, AnalysisOutcomeSampler, AnalysisSession, ProgressSimulator,
    ReportTemplateEngine, SessionEvent, SessionState, SessionStateMachine,
};
pub use medscan_core::{AnalysisOutcome, MedscanError, Patient, PatientRegistry, Result};
