//! 分析参数配置

use medscan_core::{MedscanError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 模拟分析配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 进度刷新间隔（毫秒）
    pub tick_interval_ms: u64,
    /// 进度到达 100 后展示结果前的等待（毫秒）
    pub completion_delay_ms: u64,
    /// 固定随机种子，未设置时使用系统熵
    pub seed: Option<u64>,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(MedscanError::Config(
                "analysis.tick_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    /// 按配置创建随机源
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 150,
            completion_delay_ms: 500,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_millis(150));
        assert_eq!(config.completion_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = AnalysisConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MedscanError::Config(_))));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = AnalysisConfig {
            seed: Some(42),
            ..Default::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
