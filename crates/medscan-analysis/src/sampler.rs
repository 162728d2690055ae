//! 分析结果抽样
//!
//! 所有抽样相互独立，随机源由调用方注入，便于固定种子复现。

use medscan_core::{AnalysisOutcome, DamageType, Location, Recommendation};
use rand::Rng;

/// `gen::<f64>()` 大于该阈值即判定存在损伤（约 70%）
pub const DAMAGE_THRESHOLD: f64 = 0.3;

/// 存在损伤时的置信度范围
pub const DAMAGE_CONFIDENCE: (u32, u32) = (85, 98);

/// 未见损伤时的置信度范围
pub const CLEAR_CONFIDENCE: (u32, u32) = (92, 99);

/// 分析结果抽样器
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalysisOutcomeSampler;

impl AnalysisOutcomeSampler {
    /// 抽取一次分析结果。
    ///
    /// 抽样顺序固定：是否损伤、损伤类型、置信度、部位、建议。
    /// 损伤类型无论是否存在损伤都会抽取。
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> AnalysisOutcome {
        let damage_present = rng.gen::<f64>() > DAMAGE_THRESHOLD;
        let damage_type = pick(rng, &DamageType::ALL);

        let (low, high) = if damage_present {
            DAMAGE_CONFIDENCE
        } else {
            CLEAR_CONFIDENCE
        };
        let confidence = rng.gen_range(low..=high);

        let location = pick(rng, &Location::ALL);
        let recommendation = pick(rng, &Recommendation::ALL);

        let outcome = AnalysisOutcome {
            damage_present,
            damage_type,
            confidence,
            location,
            recommendation,
        };
        tracing::debug!("Sampled analysis outcome: {:?}", outcome);
        outcome
    }
}

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_confidence_ranges() {
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..2000 {
            let outcome = AnalysisOutcomeSampler::sample(&mut rng);
            if outcome.damage_present {
                assert!((85..=98).contains(&outcome.confidence), "{:?}", outcome);
            } else {
                assert!((92..=99).contains(&outcome.confidence), "{:?}", outcome);
            }
        }
    }

    #[test]
    fn test_damage_is_the_common_case() {
        let mut rng = StdRng::seed_from_u64(11);
        let total = 5000;

        let damaged = (0..total)
            .filter(|_| AnalysisOutcomeSampler::sample(&mut rng).damage_present)
            .count();

        // 期望约 3500，留出足够余量
        assert!(damaged > 3200 && damaged < 3800, "damaged = {}", damaged);
    }

    #[test]
    fn test_all_labels_reachable() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut damage_types = HashSet::new();
        let mut locations = HashSet::new();
        let mut recommendations = HashSet::new();

        for _ in 0..500 {
            let outcome = AnalysisOutcomeSampler::sample(&mut rng);
            damage_types.insert(outcome.damage_type);
            locations.insert(outcome.location);
            recommendations.insert(outcome.recommendation);
        }

        assert_eq!(damage_types.len(), DamageType::ALL.len());
        assert_eq!(locations.len(), Location::ALL.len());
        assert_eq!(recommendations.len(), Recommendation::ALL.len());
    }

    #[test]
    fn test_zero_source_yields_clear_outcome() {
        let mut rng = StepRng::new(0, 0);

        let outcome = AnalysisOutcomeSampler::sample(&mut rng);
        assert!(!outcome.damage_present);
        assert_eq!(outcome.damage_type, DamageType::RadiusFracture);
        assert_eq!(outcome.confidence, 92);
        assert_eq!(outcome.location, Location::RightArm);
        assert_eq!(outcome.recommendation, Recommendation::TraumaConsultation);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let a = AnalysisOutcomeSampler::sample(&mut StdRng::seed_from_u64(99));
        let b = AnalysisOutcomeSampler::sample(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
