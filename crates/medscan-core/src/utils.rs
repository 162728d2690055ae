//! 通用工具函数

use chrono::NaiveDate;

/// 报告导出的默认文件名
pub fn report_file_name(patient_name: &str) -> String {
    // 文件名中不允许出现路径分隔符
    let safe: String = patient_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("заключение_{}.txt", safe)
}

/// 检查日期的展示格式 dd.mm.yyyy
pub fn format_study_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
