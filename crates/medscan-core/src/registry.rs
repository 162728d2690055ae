//! 示例患者登记表
//!
//! 启动时创建的固定患者列表，只读且不持久化。

use crate::error::{MedscanError, Result};
use crate::models::{Patient, PatientStatus};

/// 患者登记表
#[derive(Debug, Clone)]
pub struct PatientRegistry {
    patients: Vec<Patient>,
}

impl PatientRegistry {
    /// 用给定患者创建登记表
    pub fn new(patients: Vec<Patient>) -> Self {
        Self { patients }
    }

    /// 加载内置的示例患者
    pub fn with_sample_patients() -> Self {
        let patients = vec![
            Patient::new(
                "001",
                "Иванов Алексей Петрович",
                45,
                "Подозрение на перелом лучевой кости",
                PatientStatus::NeedsAnalysis,
            ),
            Patient::new(
                "002",
                "Петрова Мария Сергеевна",
                62,
                "Контроль после эндопротезирования тазобедренного сустава",
                PatientStatus::AnalysisComplete,
            ),
            Patient::new(
                "003",
                "Сидоров Дмитрий Иванович",
                28,
                "Спортивная травма коленного сустава",
                PatientStatus::NeedsAnalysis,
            ),
            Patient::new(
                "004",
                "Козлова Анна Викторовна",
                35,
                "Артроз голеностопного сустава",
                PatientStatus::NewImages,
            ),
            Patient::new(
                "005",
                "Николаев Владимир Александрович",
                71,
                "Остеопороз, компрессионный перелом",
                PatientStatus::AnalysisComplete,
            ),
            Patient::new(
                "006",
                "Федорова Екатерина Олеговна",
                52,
                "Посттравматическая деформация плечевой кости",
                PatientStatus::NeedsAnalysis,
            ),
        ];

        tracing::debug!("Loaded {} sample patients", patients.len());
        Self::new(patients)
    }

    /// 按病历号查找患者
    pub fn find(&self, id: &str) -> Result<&Patient> {
        self.patients
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| MedscanError::NotFound(format!("Patient {} not found", id)))
    }

    /// 按登记顺序返回所有患者
    pub fn all(&self) -> &[Patient] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

impl Default for PatientRegistry {
    fn default() -> Self {
        Self::with_sample_patients()
    }
}
