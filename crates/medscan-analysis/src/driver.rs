//! 分析定时驱动
//!
//! 以固定间隔推进会话进度，并把每次推进的结果发送给外壳。
//! 重新开始分析前必须先停止上一个定时任务，保证同一会话只有一条进度流。

use crate::config::AnalysisConfig;
use crate::progress::ProgressTick;
use crate::session::AnalysisSession;
use crate::state_machine::SessionState;
use medscan_core::Result;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

/// 分析定时驱动
#[derive(Debug)]
pub struct AnalysisDriver {
    session: Arc<Mutex<AnalysisSession>>,
    config: AnalysisConfig,
    task: Option<JoinHandle<()>>,
}

impl AnalysisDriver {
    /// 创建驱动，接管会话
    pub fn new(session: AnalysisSession, config: AnalysisConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            config,
            task: None,
        }
    }

    /// 共享的会话句柄
    pub fn session(&self) -> Arc<Mutex<AnalysisSession>> {
        self.session.clone()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 开始分析并返回进度流。
    ///
    /// 已有定时任务时先停止它，再重置会话进度。
    pub async fn start<R>(&mut self, rng: R) -> Result<mpsc::UnboundedReceiver<ProgressTick>>
    where
        R: Rng + Send + 'static,
    {
        self.stop().await;
        let session_id = {
            let mut session = self.session.lock().await;
            session.start_analysis()?;
            session.id()
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let session = self.session.clone();
        let period = self.config.tick_interval();

        info!("Starting analysis timer for session {} every {:?}", session_id, period);

        self.task = Some(tokio::spawn(async move {
            let mut rng = rng;
            let mut ticker = interval(period);
            // 第一次 tick 立即返回，跳过它使首次推进发生在一个周期之后
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let result = session.lock().await.advance(&mut rng);
                match result {
                    Ok(tick) => {
                        let completed = tick.completed;
                        if tx.send(tick).is_err() {
                            debug!("Progress receiver for session {} dropped", session_id);
                        }
                        if completed {
                            info!("Analysis timer for session {} finished", session_id);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Analysis timer for session {} stopped: {}", session_id, e);
                        break;
                    }
                }
            }
        }));

        Ok(rx)
    }

    /// 停止定时任务，等待其真正退出。返回是否中止了一个仍在运行的任务。
    pub async fn stop(&mut self) -> bool {
        let Some(handle) = self.task.take() else {
            return false;
        };
        if handle.is_finished() {
            return false;
        }

        handle.abort();
        // 被中止的任务返回 JoinError::Cancelled
        let _ = handle.await;
        debug!("Previous analysis timer aborted");
        true
    }

    /// 中止分析：停止定时任务并把会话退回到已加载影像状态
    pub async fn cancel(&mut self) -> Result<()> {
        self.stop().await;
        let mut session = self.session.lock().await;
        if session.state() == SessionState::Analyzing {
            session.cancel()?;
        }
        Ok(())
    }

    /// 等待当前定时任务自然结束
    pub async fn wait(&mut self) {
        if let Some(handle) = self.task.take() {
            if let Err(e) = handle.await {
                warn!("Analysis timer ended abnormally: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for AnalysisDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use medscan_core::PatientRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fast_config() -> AnalysisConfig {
        AnalysisConfig {
            tick_interval_ms: 1,
            completion_delay_ms: 0,
            seed: Some(7),
        }
    }

    fn attached_session() -> AnalysisSession {
        let registry = PatientRegistry::with_sample_patients();
        let mut session =
            AnalysisSession::with_study_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        session.select_patient(registry.find("003").unwrap()).unwrap();
        session.attach_image("knee.jpg").unwrap();
        session
    }

    #[tokio::test]
    async fn test_run_to_completion() {
        let mut driver = AnalysisDriver::new(attached_session(), fast_config());
        let rng = driver.config().rng();
        let mut rx = driver.start(rng).await.unwrap();

        let mut last = 0;
        let mut completed = false;
        while let Some(tick) = rx.recv().await {
            assert!(tick.value > last);
            last = tick.value;
            completed = tick.completed;
        }

        assert!(completed);
        assert_eq!(last, 100);
        driver.wait().await;
        assert!(!driver.is_running());

        let session = driver.session();
        let session = session.lock().await;
        assert_eq!(session.state(), SessionState::Completed);
        assert!(session.outcome().is_some());
        assert!(session.report().is_some());
    }

    #[tokio::test]
    async fn test_restart_aborts_previous_stream() {
        let mut driver = AnalysisDriver::new(attached_session(), fast_config());
        let mut first = driver.start(StdRng::seed_from_u64(1)).await.unwrap();

        let tick = first.recv().await.unwrap();
        assert!(tick.value > 0);

        let mut second = driver.start(StdRng::seed_from_u64(2)).await.unwrap();

        // 旧任务已结束，其发送端被释放：缓冲耗尽后收到 None
        while first.try_recv().is_ok() {}
        assert!(first.recv().await.is_none());

        let tick = second.recv().await.unwrap();
        assert!(tick.value <= 10, "restart should begin from zero, got {}", tick.value);

        while second.recv().await.is_some() {}
        let session = driver.session();
        assert_eq!(session.lock().await.state(), SessionState::Completed);
    }

    #[tokio::test]
    async fn test_cancel_returns_to_image_attached() {
        let config = AnalysisConfig {
            tick_interval_ms: 50,
            ..fast_config()
        };
        let mut driver = AnalysisDriver::new(attached_session(), config);
        let _rx = driver.start(StdRng::seed_from_u64(3)).await.unwrap();
        assert!(driver.is_running());

        driver.cancel().await.unwrap();
        assert!(!driver.is_running());

        let session = driver.session();
        let session = session.lock().await;
        assert_eq!(session.state(), SessionState::ImageAttached);
        assert_eq!(session.progress(), 0);
    }

    #[tokio::test]
    async fn test_start_requires_image() {
        let mut session = AnalysisSession::new();
        let registry = PatientRegistry::with_sample_patients();
        session.select_patient(registry.find("001").unwrap()).unwrap();

        let mut driver = AnalysisDriver::new(session, fast_config());
        assert!(driver.start(StdRng::seed_from_u64(1)).await.is_err());
        assert!(!driver.is_running());
    }
}
