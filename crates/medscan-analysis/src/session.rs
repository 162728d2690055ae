//! 分析会话
//!
//! 一次分析的全部可变状态集中在 [`AnalysisSession`] 中，由外壳持有其生命周期。
//! 每个操作先通过状态机校验，校验失败时不修改任何字段。

use crate::progress::{
    ProgressBand, ProgressSimulator, ProgressTick, PROGRESS_MAX, STATUS_FINISHED, STATUS_PREPARING,
};
use crate::report::ReportTemplateEngine;
use crate::sampler::AnalysisOutcomeSampler;
use crate::state_machine::{SessionEvent, SessionState, SessionStateMachine};
use chrono::NaiveDate;
use medscan_core::{AnalysisOutcome, MedscanError, Patient, Result, StudyType};
use rand::Rng;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 选择患者后图库中的历史影像
pub const SAMPLE_GALLERY: [&str; 2] = [
    "Рентген правой руки (12.01.2024)",
    "КТ левого колена (05.01.2024)",
];

/// 分析会话
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    id: Uuid,
    state: SessionState,
    state_machine: SessionStateMachine,
    /// 只保存病历号，患者数据仍归登记表所有
    patient_id: Option<String>,
    image_path: Option<PathBuf>,
    gallery: Vec<String>,
    study_type: StudyType,
    study_date: NaiveDate,
    comments: String,
    progress: i32,
    outcome: Option<AnalysisOutcome>,
    report: Option<String>,
}

impl AnalysisSession {
    /// 创建空闲会话，检查日期默认为今天
    pub fn new() -> Self {
        Self::with_study_date(chrono::Local::now().date_naive())
    }

    pub fn with_study_date(study_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            state_machine: SessionStateMachine::new(),
            patient_id: None,
            image_path: None,
            gallery: Vec::new(),
            study_type: StudyType::default(),
            study_date,
            comments: String::new(),
            progress: 0,
            outcome: None,
            report: None,
        }
    }

    /// 选择患者，清空影像和上一次的结果
    pub fn select_patient(&mut self, patient: &Patient) -> Result<()> {
        let next = self.next_state(SessionEvent::SelectPatient)?;

        self.patient_id = Some(patient.id.clone());
        self.image_path = None;
        self.gallery = SAMPLE_GALLERY.iter().map(|s| s.to_string()).collect();
        self.reset_analysis();
        self.state = next;

        tracing::info!("Session {} selected patient {}", self.id, patient.id);
        Ok(())
    }

    /// 关联已成功解码的影像文件
    pub fn attach_image(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let next = self.next_state(SessionEvent::AttachImage)?;
        let path = path.into();

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.gallery.push(format!("Новый снимок: {}", file_name));
        self.image_path = Some(path);
        self.reset_analysis();
        self.state = next;

        tracing::info!("Session {} attached image {}", self.id, file_name);
        Ok(())
    }

    /// 开始分析；正在分析时先中止再从 0 开始
    pub fn start_analysis(&mut self) -> Result<()> {
        if self.state == SessionState::Analyzing {
            self.cancel()?;
        }
        let next = self.next_state(SessionEvent::StartAnalysis)?;

        self.reset_analysis();
        self.state = next;

        tracing::info!("Session {} started analysis", self.id);
        Ok(())
    }

    /// 中止正在进行的分析
    pub fn cancel(&mut self) -> Result<()> {
        let next = self.next_state(SessionEvent::Cancel)?;

        tracing::info!("Session {} analysis canceled at {}%", self.id, self.progress);
        self.reset_analysis();
        self.state = next;
        Ok(())
    }

    /// 推进一次进度；到达 100 时在同一次调用内抽样并生成报告
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ProgressTick> {
        self.next_state(SessionEvent::Advance)?;

        let tick = ProgressSimulator::tick(self.progress, rng)?;
        self.progress = tick.value;
        tracing::debug!("Session {} progress {}%", self.id, tick.value);

        if tick.completed {
            self.complete(rng)?;
        }
        Ok(tick)
    }

    /// 为到达 100 的分析抽取结果
    pub fn sample_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<AnalysisOutcome> {
        let ready = self.state == SessionState::Analyzing
            && self.progress == PROGRESS_MAX
            && self.outcome.is_none();
        if !ready {
            return Err(self.invalid(SessionEvent::Complete));
        }
        Ok(AnalysisOutcomeSampler::sample(rng))
    }

    /// 用当前备注重新生成报告，仅在分析完成后可用
    pub fn render_report(&self) -> Result<String> {
        match (&self.state, &self.outcome) {
            (SessionState::Completed, Some(outcome)) => {
                Ok(ReportTemplateEngine::render(outcome, &self.comments))
            }
            _ => Err(MedscanError::InvalidStateTransition {
                from: self.state.to_string(),
                event: "Render".to_string(),
            }),
        }
    }

    /// 开始新的分析：清空备注和进度，保留患者、影像和图库
    pub fn new_analysis(&mut self) -> Result<()> {
        let next = self.next_state(SessionEvent::NewAnalysis)?;

        self.comments.clear();
        self.reset_analysis();
        self.state = next;

        tracing::info!("Session {} ready for a new analysis", self.id);
        Ok(())
    }

    pub fn set_study_type(&mut self, study_type: StudyType) {
        self.study_type = study_type;
    }

    pub fn set_study_date(&mut self, study_date: NaiveDate) {
        self.study_date = study_date;
    }

    pub fn set_comments(&mut self, comments: impl Into<String>) {
        self.comments = comments.into();
    }

    /// 当前进度对应的状态文字
    pub fn status_text(&self) -> &'static str {
        match self.state {
            SessionState::Analyzing if self.progress == 0 => STATUS_PREPARING,
            SessionState::Analyzing => ProgressBand::of(self.progress).status_text(),
            SessionState::Completed => STATUS_FINISHED,
            _ => "",
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn gallery(&self) -> &[String] {
        &self.gallery
    }

    pub fn study_type(&self) -> StudyType {
        self.study_type
    }

    pub fn study_date(&self) -> NaiveDate {
        self.study_date
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        self.outcome.as_ref()
    }

    /// 完成时生成的报告文本
    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    fn complete<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let next = self.next_state(SessionEvent::Complete)?;
        let outcome = self.sample_outcome(rng)?;

        self.report = Some(ReportTemplateEngine::render(&outcome, &self.comments));
        self.outcome = Some(outcome);
        self.state = next;

        tracing::info!(
            "Session {} completed: damage_present={}, confidence={}%",
            self.id,
            outcome.damage_present,
            outcome.confidence
        );
        Ok(())
    }

    fn next_state(&self, event: SessionEvent) -> Result<SessionState> {
        self.state_machine.transition(self.state, event)
    }

    fn invalid(&self, event: SessionEvent) -> MedscanError {
        MedscanError::InvalidStateTransition {
            from: self.state.to_string(),
            event: event.to_string(),
        }
    }

    fn reset_analysis(&mut self) {
        self.progress = 0;
        self.outcome = None;
        self.report = None;
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}
