//! 分析会话状态机
//!
//! 管理一次影像分析从选择患者到生成报告的状态转换

use medscan_core::{MedscanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 会话状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,            // 未选择患者
    PatientSelected, // 已选择患者
    ImageAttached,   // 已加载影像
    Analyzing,       // 分析中
    Completed,       // 分析完成
}

/// 会话状态转换事件
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    SelectPatient,
    AttachImage,
    StartAnalysis,
    Advance,
    Complete,
    NewAnalysis,
    Cancel,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 会话状态机
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    transitions: HashMap<(SessionState, SessionEvent), SessionState>,
}

impl SessionStateMachine {
    /// 创建新的状态机实例
    pub fn new() -> Self {
        use SessionEvent as E;
        use SessionState as S;

        let mut transitions = HashMap::new();

        // 主流程
        transitions.insert((S::Idle, E::SelectPatient), S::PatientSelected);
        transitions.insert((S::PatientSelected, E::AttachImage), S::ImageAttached);
        transitions.insert((S::ImageAttached, E::StartAnalysis), S::Analyzing);
        transitions.insert((S::Analyzing, E::Advance), S::Analyzing);
        transitions.insert((S::Analyzing, E::Complete), S::Completed);
        transitions.insert((S::Completed, E::NewAnalysis), S::ImageAttached);

        // 切换患者
        transitions.insert((S::PatientSelected, E::SelectPatient), S::PatientSelected);
        transitions.insert((S::ImageAttached, E::SelectPatient), S::PatientSelected);
        transitions.insert((S::Completed, E::SelectPatient), S::PatientSelected);

        // 重新上传影像
        transitions.insert((S::ImageAttached, E::AttachImage), S::ImageAttached);
        transitions.insert((S::Completed, E::AttachImage), S::ImageAttached);

        // 中止正在进行的分析
        transitions.insert((S::Analyzing, E::Cancel), S::ImageAttached);

        Self { transitions }
    }

    /// 检查状态转换是否有效
    pub fn can_transition(&self, from: SessionState, event: SessionEvent) -> bool {
        self.transitions.contains_key(&(from, event))
    }

    /// 执行状态转换
    pub fn transition(&self, from: SessionState, event: SessionEvent) -> Result<SessionState> {
        match self.transitions.get(&(from, event)) {
            Some(to) => Ok(*to),
            None => Err(MedscanError::InvalidStateTransition {
                from: from.to_string(),
                event: event.to_string(),
            }),
        }
    }

    /// 获取所有可能的状态
    pub fn get_all_states() -> Vec<SessionState> {
        vec![
            SessionState::Idle,
            SessionState::PatientSelected,
            SessionState::ImageAttached,
            SessionState::Analyzing,
            SessionState::Completed,
        ]
    }

    /// 获取状态的所有可能事件
    pub fn get_possible_events(&self, current_state: SessionState) -> Vec<SessionEvent> {
        self.transitions
            .keys()
            .filter(|(state, _)| *state == current_state)
            .map(|(_, event)| *event)
            .collect()
    }
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
