//! 诊断报告模板
//!
//! 报告完全由分析结果和医生备注决定，不含任何随机性。

use chrono::NaiveDate;
use medscan_core::utils::format_study_date;
use medscan_core::{AnalysisOutcome, DamageType, Patient, StudyType};
use std::fmt::Write;

/// 备注为空时的占位文字
pub const NO_COMMENTS: &str = "Комментарии отсутствуют";

/// 无损伤报告中的类型标记
pub const NO_PATHOLOGY: &str = "ПАТОЛОГИЙ НЕ ОБНАРУЖЕНО";

/// 描述表之外的损伤类型使用的描述
pub const FALLBACK_DESCRIPTION: &str =
    "Обнаружены изменения костной структуры, требующие уточнения";

/// 导出文件标题
pub const EXPORT_TITLE: &str = "МЕДИЦИНСКОЕ ЗАКЛЮЧЕНИЕ";

/// 损伤类型的影像学描述
pub fn damage_description(damage_type: DamageType) -> &'static str {
    match damage_type {
        DamageType::RadiusFracture => {
            "Линия перелома видна в средней трети диафиза, смещение фрагментов минимальное"
        }
        DamageType::TibiaCrack => "Линейный дефект кортикального слоя без смещения отломков",
        DamageType::ShoulderDislocation => {
            "Нарушение конгруэнтности суставных поверхностей, головка плеча смещена"
        }
        DamageType::KneeOsteophytes => {
            "Краевые костные разрастания в области суставных поверхностей"
        }
        DamageType::Osteoporosis => {
            "Снижение плотности костной ткани, истончение кортикального слоя"
        }
        DamageType::HipArthrosis => "Сужение суставной щели, субхондральный остеосклероз",
    }
}

/// 按标签查找描述，未知标签返回通用描述
pub fn describe_damage(label: &str) -> &'static str {
    match DamageType::from_label(label) {
        Some(damage_type) => damage_description(damage_type),
        None => {
            tracing::debug!("Unknown damage type '{}', using fallback description", label);
            FALLBACK_DESCRIPTION
        }
    }
}

/// 报告模板引擎
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportTemplateEngine;

impl ReportTemplateEngine {
    /// 生成详细报告文本。
    ///
    /// 备注为空字符串时使用占位文字，否则原样写入（包括只含空白的备注）。
    pub fn render(outcome: &AnalysisOutcome, comments: &str) -> String {
        let comments = if comments.is_empty() {
            NO_COMMENTS
        } else {
            comments
        };

        match outcome.reported_damage() {
            Some(damage_type) => format!(
                "ЛОКАЛИЗАЦИЯ: {location}\n\
                 ТИП ПОВРЕЖДЕНИЯ: {kind}\n\
                 УВЕРЕННОСТЬ АНАЛИЗА: {confidence}%\n\
                 \n\
                 ОПИСАНИЕ:\n\
                 - {description}\n\
                 - Костная структура требует внимания специалиста\n\
                 - Рекомендовано дополнительное обследование\n\
                 \n\
                 РЕКОМЕНДАЦИИ:\n\
                 - {recommendation}\n\
                 - Ограничение нагрузки на конечность\n\
                 - Контрольный осмотр через 7-10 дней\n\
                 \n\
                 КОММЕНТАРИИ ВРАЧА:\n\
                 {comments}",
                location = outcome.location.label(),
                kind = damage_type.label().to_uppercase(),
                confidence = outcome.confidence,
                description = damage_description(damage_type),
                recommendation = outcome.recommendation.label(),
                comments = comments,
            ),
            None => format!(
                "ЛОКАЛИЗАЦИЯ: {location}\n\
                 ТИП ПОВРЕЖДЕНИЯ: {kind}\n\
                 УВЕРЕННОСТЬ АНАЛИЗА: {confidence}%\n\
                 \n\
                 ОПИСАНИЕ:\n\
                 - Костная структура не изменена\n\
                 - Суставные щели сохранены\n\
                 - Признаков остеопороза не выявлено\n\
                 - Контуры костей ровные, четкие\n\
                 \n\
                 РЕКОМЕНДАЦИИ:\n\
                 - Плановое наблюдение\n\
                 - Стандартные профилактические меры\n\
                 \n\
                 КОММЕНТАРИИ ВРАЧА:\n\
                 {comments}",
                location = outcome.location.label(),
                kind = NO_PATHOLOGY,
                confidence = outcome.confidence,
                comments = comments,
            ),
        }
    }

    /// 结果卡片标题
    pub fn headline(outcome: &AnalysisOutcome) -> &'static str {
        if outcome.damage_present {
            "Обнаружены повреждения"
        } else {
            "Повреждений не обнаружено"
        }
    }

    /// 结果卡片的一句话说明
    pub fn summary(outcome: &AnalysisOutcome) -> String {
        match outcome.reported_damage() {
            Some(damage_type) => format!("На снимке обнаружены признаки {}", damage_type.label()),
            None => "Снимок в пределах нормы, явных патологий не выявлено".to_string(),
        }
    }

    /// 结果页顶部的检查信息
    pub fn study_card(patient: &Patient, study_type: StudyType, study_date: NaiveDate) -> String {
        format!(
            "Пациент: {}\nИсследование: {}\nДата: {}\nДиагноз: {}",
            patient.name,
            study_type.label(),
            format_study_date(study_date),
            patient.diagnosis
        )
    }

    /// 导出文件的完整内容
    pub fn export_document(patient_name: &str, outcome: &AnalysisOutcome, details: &str) -> String {
        let mut doc = String::new();
        // 写入 String 不会失败
        let _ = writeln!(doc, "{}", EXPORT_TITLE);
        let _ = writeln!(doc, "{}\n", "=".repeat(50));
        let _ = writeln!(doc, "Пациент: {}", patient_name);
        let _ = writeln!(doc, "Результат: {}", Self::headline(outcome));
        let _ = writeln!(doc, "Описание: {}\n", Self::summary(outcome));
        doc.push_str(details);
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medscan_core::{Location, PatientStatus, Recommendation};

    fn damaged() -> AnalysisOutcome {
        AnalysisOutcome {
            damage_present: true,
            damage_type: DamageType::ShoulderDislocation,
            confidence: 91,
            location: Location::LeftArm,
            recommendation: Recommendation::SoftTissueMri,
        }
    }

    fn clear() -> AnalysisOutcome {
        AnalysisOutcome {
            damage_present: false,
            ..damaged()
        }
    }

    #[test]
    fn test_render_damage_template() {
        let report = ReportTemplateEngine::render(&damaged(), "Повторить через неделю");

        assert!(report.starts_with("ЛОКАЛИЗАЦИЯ: Левая рука\n"));
        assert!(report.contains("ТИП ПОВРЕЖДЕНИЯ: ВЫВИХ ПЛЕЧЕВОГО СУСТАВА\n"));
        assert!(report.contains("УВЕРЕННОСТЬ АНАЛИЗА: 91%\n"));
        assert!(report.contains(
            "- Нарушение конгруэнтности суставных поверхностей, головка плеча смещена\n"
        ));
        assert!(report.contains("РЕКОМЕНДАЦИИ:\n- МРТ мягких тканей\n"));
        assert!(report.ends_with("КОММЕНТАРИИ ВРАЧА:\nПовторить через неделю"));
    }

    #[test]
    fn test_render_clear_template_omits_damage_type() {
        let report = ReportTemplateEngine::render(&clear(), "");

        assert!(report.contains("ТИП ПОВРЕЖДЕНИЯ: ПАТОЛОГИЙ НЕ ОБНАРУЖЕНО\n"));
        assert!(!report.contains("ВЫВИХ"));
        assert!(!report.contains(damage_description(DamageType::ShoulderDislocation)));
        assert!(report.contains("- Плановое наблюдение\n"));
        assert!(!report.contains("МРТ мягких тканей"));
        assert!(report.ends_with(NO_COMMENTS));
    }

    #[test]
    fn test_render_is_deterministic() {
        let outcome = damaged();
        let first = ReportTemplateEngine::render(&outcome, "abc");
        for _ in 0..10 {
            assert_eq!(ReportTemplateEngine::render(&outcome, "abc"), first);
        }
    }

    #[test]
    fn test_empty_comments_use_placeholder() {
        let report = ReportTemplateEngine::render(&damaged(), "");
        assert!(report.ends_with(&format!("КОММЕНТАРИИ ВРАЧА:\n{}", NO_COMMENTS)));

        // 只含空白的备注不是空备注
        let report = ReportTemplateEngine::render(&damaged(), "   ");
        assert!(report.ends_with("КОММЕНТАРИИ ВРАЧА:\n   "));
        assert!(!report.contains(NO_COMMENTS));

        let comments = "  отёк мягких тканей\nконтроль  ";
        let report = ReportTemplateEngine::render(&damaged(), comments);
        assert!(report.ends_with(comments));
    }

    #[test]
    fn test_describe_damage_fallback() {
        assert_eq!(describe_damage("норма"), FALLBACK_DESCRIPTION);
        assert_eq!(describe_damage(""), FALLBACK_DESCRIPTION);
        assert_eq!(
            describe_damage("артроз тазобедренного сустава"),
            "Сужение суставной щели, субхондральный остеосклероз"
        );
    }

    #[test]
    fn test_headline_and_summary() {
        assert_eq!(ReportTemplateEngine::headline(&damaged()), "Обнаружены повреждения");
        assert_eq!(
            ReportTemplateEngine::summary(&damaged()),
            "На снимке обнаружены признаки вывих плечевого сустава"
        );
        assert_eq!(ReportTemplateEngine::headline(&clear()), "Повреждений не обнаружено");
        assert_eq!(
            ReportTemplateEngine::summary(&clear()),
            "Снимок в пределах нормы, явных патологий не выявлено"
        );
    }

    #[test]
    fn test_study_card() {
        let patient = Patient::new("007", "Тестов Тест", 40, "Ушиб", PatientStatus::NewImages);
        let date = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();

        let card = ReportTemplateEngine::study_card(&patient, StudyType::JointMri, date);
        assert_eq!(
            card,
            "Пациент: Тестов Тест\nИсследование: МРТ суставов\nДата: 12.01.2024\nДиагноз: Ушиб"
        );
    }

    #[test]
    fn test_export_document_layout() {
        let details = ReportTemplateEngine::render(&clear(), "");
        let doc = ReportTemplateEngine::export_document("Тестов Тест", &clear(), &details);

        let mut lines = doc.lines();
        assert_eq!(lines.next(), Some(EXPORT_TITLE));
        assert_eq!(lines.next(), Some("=".repeat(50).as_str()));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("Пациент: Тестов Тест"));
        assert_eq!(lines.next(), Some("Результат: Повреждений не обнаружено"));
        assert_eq!(
            lines.next(),
            Some("Описание: Снимок в пределах нормы, явных патологий не выявлено")
        );
        assert_eq!(lines.next(), Some(""));
        assert!(doc.ends_with(&details));
    }
}
