//! 核心数据模型定义

use crate::error::{MedscanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 患者基本信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: String,        // 病历号，如 "001"
    pub name: String,      // 患者姓名
    pub age: u32,          // 年龄
    pub diagnosis: String, // 初步诊断
    pub status: PatientStatus,
}

impl Patient {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        diagnosis: impl Into<String>,
        status: PatientStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            diagnosis: diagnosis.into(),
            status,
        }
    }
}

/// 患者状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PatientStatus {
    NeedsAnalysis,    // 需要分析
    AnalysisComplete, // 分析完成
    NewImages,        // 有新影像
}

impl PatientStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PatientStatus::NeedsAnalysis => "Требуется анализ",
            PatientStatus::AnalysisComplete => "Анализ завершен",
            PatientStatus::NewImages => "Новые снимки",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 检查类型（仅用于展示，不参与分析逻辑）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum StudyType {
    #[default]
    UpperLimbRadiography, // 上肢X线
    LowerLimbRadiography, // 下肢X线
    LimbCt,               // 四肢CT
    JointMri,             // 关节MRI
    Survey,               // 平片
}

impl StudyType {
    pub const ALL: [StudyType; 5] = [
        StudyType::UpperLimbRadiography,
        StudyType::LowerLimbRadiography,
        StudyType::LimbCt,
        StudyType::JointMri,
        StudyType::Survey,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StudyType::UpperLimbRadiography => "Рентгенография верхних конечностей",
            StudyType::LowerLimbRadiography => "Рентгенография нижних конечностей",
            StudyType::LimbCt => "КТ конечностей",
            StudyType::JointMri => "МРТ суставов",
            StudyType::Survey => "Обзорный снимок",
        }
    }

    /// 命令行使用的短名称
    pub fn slug(&self) -> &'static str {
        match self {
            StudyType::UpperLimbRadiography => "upper-limbs",
            StudyType::LowerLimbRadiography => "lower-limbs",
            StudyType::LimbCt => "ct-limbs",
            StudyType::JointMri => "mri-joints",
            StudyType::Survey => "survey",
        }
    }
}

impl fmt::Display for StudyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StudyType {
    type Err = MedscanError;

    /// 同时接受短名称和完整名称
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        StudyType::ALL
            .into_iter()
            .find(|t| t.slug().eq_ignore_ascii_case(s) || t.label() == s)
            .ok_or_else(|| MedscanError::Validation(format!("unknown study type '{}'", s)))
    }
}

/// 损伤类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DamageType {
    RadiusFracture,      // 桡骨骨折
    TibiaCrack,          // 胫骨裂纹
    ShoulderDislocation, // 肩关节脱位
    KneeOsteophytes,     // 膝关节骨赘
    Osteoporosis,        // 骨质疏松征象
    HipArthrosis,        // 髋关节病
}

impl DamageType {
    pub const ALL: [DamageType; 6] = [
        DamageType::RadiusFracture,
        DamageType::TibiaCrack,
        DamageType::ShoulderDislocation,
        DamageType::KneeOsteophytes,
        DamageType::Osteoporosis,
        DamageType::HipArthrosis,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DamageType::RadiusFracture => "перелом лучевой кости",
            DamageType::TibiaCrack => "трещина большеберцовой кости",
            DamageType::ShoulderDislocation => "вывих плечевого сустава",
            DamageType::KneeOsteophytes => "остеофиты коленного сустава",
            DamageType::Osteoporosis => "признаки остеопороза",
            DamageType::HipArthrosis => "артроз тазобедренного сустава",
        }
    }

    /// 按标签查找；不在表中的标签返回 None
    pub fn from_label(label: &str) -> Option<DamageType> {
        DamageType::ALL.into_iter().find(|t| t.label() == label.trim())
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 病变部位
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Location {
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::RightArm,
        Location::LeftArm,
        Location::RightLeg,
        Location::LeftLeg,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Location::RightArm => "Правая рука",
            Location::LeftArm => "Левая рука",
            Location::RightLeg => "Правая нога",
            Location::LeftLeg => "Левая нога",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 处理建议
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Recommendation {
    TraumaConsultation, // 创伤科会诊
    ClarifyingCt,       // CT进一步检查
    SoftTissueMri,      // 软组织MRI
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [
        Recommendation::TraumaConsultation,
        Recommendation::ClarifyingCt,
        Recommendation::SoftTissueMri,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::TraumaConsultation => "Консультация травматолога",
            Recommendation::ClarifyingCt => "КТ исследование для уточнения",
            Recommendation::SoftTissueMri => "МРТ мягких тканей",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 一次分析的随机结果，生成后不可变
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub damage_present: bool,
    /// 始终被抽取，只有 `damage_present` 为真时才写入报告
    pub damage_type: DamageType,
    pub confidence: u32, // 百分比
    pub location: Location,
    pub recommendation: Recommendation,
}

impl AnalysisOutcome {
    /// 报告中实际呈现的损伤类型
    pub fn reported_damage(&self) -> Option<DamageType> {
        self.damage_present.then_some(self.damage_type)
    }
}
