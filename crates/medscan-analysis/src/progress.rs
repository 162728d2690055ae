//! 分析进度模拟
//!
//! 进度值按所在区段以随机步长推进，区段越靠后步长越小。

use medscan_core::{MedscanError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 进度上限，到达即视为分析完成
pub const PROGRESS_MAX: i32 = 100;

/// 分析开始、首个刻度之前的状态文字
pub const STATUS_PREPARING: &str = "Подготовка к анализу...";

/// 进度到达上限后的状态文字
pub const STATUS_FINISHED: &str = "Анализ завершен!";

/// 进度区段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProgressBand {
    Loading,       // < 25
    Preprocessing, // < 50
    BoneAnalysis,  // < 75
    Reporting,     // >= 75
}

impl ProgressBand {
    /// 当前进度所在区段
    pub fn of(current: i32) -> Self {
        match current {
            v if v < 25 => ProgressBand::Loading,
            v if v < 50 => ProgressBand::Preprocessing,
            v if v < 75 => ProgressBand::BoneAnalysis,
            _ => ProgressBand::Reporting,
        }
    }

    /// 该区段的步长范围（两端包含）
    pub fn increment_range(&self) -> (i32, i32) {
        match self {
            ProgressBand::Loading => (5, 10),
            ProgressBand::Preprocessing => (3, 8),
            ProgressBand::BoneAnalysis => (2, 6),
            ProgressBand::Reporting => (1, 4),
        }
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            ProgressBand::Loading => "Загрузка изображения...",
            ProgressBand::Preprocessing => "Предварительная обработка...",
            ProgressBand::BoneAnalysis => "Анализ костной структуры...",
            ProgressBand::Reporting => "Формирование заключения...",
        }
    }
}

/// 一次推进的结果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressTick {
    /// 推进前所在区段
    pub band: ProgressBand,
    pub value: i32,
    pub completed: bool,
}

impl ProgressTick {
    pub fn status_text(&self) -> &'static str {
        if self.completed {
            STATUS_FINISHED
        } else {
            self.band.status_text()
        }
    }
}

/// 进度模拟器
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgressSimulator;

impl ProgressSimulator {
    /// 从 `current` 推进一步，结果不超过 100。
    ///
    /// `current` 必须位于 `0..100`：越界返回 `InvalidProgressValue`，
    /// 已经是 100 时返回 `InvalidStateTransition`，调用方应在完成后停止调用。
    pub fn advance<R: Rng + ?Sized>(current: i32, rng: &mut R) -> Result<i32> {
        if !(0..=PROGRESS_MAX).contains(&current) {
            return Err(MedscanError::InvalidProgressValue(current));
        }
        if current == PROGRESS_MAX {
            return Err(MedscanError::InvalidStateTransition {
                from: "Completed".to_string(),
                event: "Advance".to_string(),
            });
        }

        let (low, high) = ProgressBand::of(current).increment_range();
        let increment = rng.gen_range(low..=high);

        Ok((current + increment).min(PROGRESS_MAX))
    }

    /// 推进一步并附带区段信息
    pub fn tick<R: Rng + ?Sized>(current: i32, rng: &mut R) -> Result<ProgressTick> {
        let band = ProgressBand::of(current);
        let value = Self::advance(current, rng)?;
        Ok(ProgressTick {
            band,
            value,
            completed: value == PROGRESS_MAX,
        })
    }
}
