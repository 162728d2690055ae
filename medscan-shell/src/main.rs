//! MedScan 终端外壳
//!
//! 浏览示例患者、关联影像、运行模拟分析并导出诊断报告。

mod config;
mod export;
mod image;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use medscan_analysis::progress::STATUS_PREPARING;
use medscan_analysis::{AnalysisDriver, AnalysisSession, ReportTemplateEngine};
use medscan_core::{Patient, PatientRegistry, StudyType};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::ShellConfig;

/// MedScan 命令行参数
#[derive(Parser, Debug)]
#[command(name = "medscan-shell")]
#[command(about = "Simulated X-ray analysis and diagnostic report generator")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别，覆盖配置文件
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 列出示例患者
    Patients {
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 为患者运行一次模拟分析
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// 病历号，如 001
    #[arg(short, long)]
    patient: String,

    /// 影像文件 (png, jpg, jpeg, bmp)
    #[arg(short, long)]
    image: PathBuf,

    /// 检查类型: upper-limbs, lower-limbs, ct-limbs, mri-joints, survey
    #[arg(short = 't', long, default_value = "upper-limbs")]
    study_type: StudyType,

    /// 检查日期 YYYY-MM-DD，默认今天
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// 医生备注
    #[arg(long, default_value = "")]
    comments: String,

    /// 固定随机种子，覆盖配置
    #[arg(long)]
    seed: Option<u64>,

    /// 导出报告；不带路径时写入配置的导出目录
    #[arg(short, long)]
    export: Option<Option<PathBuf>>,

    /// 以 JSON 输出结果
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ShellConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // 初始化日志；标准输出只留给结果
    tracing_subscriber::fmt()
        .with_env_filter(config.logging.level.as_str())
        .with_writer(std::io::stderr)
        .init();
    debug!("Loaded configuration: {:?}", config);

    let registry = PatientRegistry::with_sample_patients();

    match cli.command {
        Command::Patients { json } => list_patients(&registry, json),
        Command::Analyze(args) => analyze(&registry, &config, args, &mut std::io::stdout()).await,
    }
}

fn list_patients(registry: &PatientRegistry, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(registry.all())?);
        return Ok(());
    }

    for patient in registry.all() {
        println!("{}\n", patient_card(patient));
    }
    Ok(())
}

fn patient_card(patient: &Patient) -> String {
    format!(
        "👤 {}\n🎂 {} лет  📋 №{}\n📝 Диагноз: {}\n📍 {}",
        patient.name, patient.age, patient.id, patient.diagnosis, patient.status
    )
}

/// 运行一次分析，结果写入 `out`；日志和导出提示不进入 `out`
async fn analyze(
    registry: &PatientRegistry,
    config: &ShellConfig,
    args: AnalyzeArgs,
    out: &mut impl Write,
) -> Result<()> {
    let patient = registry.find(&args.patient)?;

    let mut session = AnalysisSession::new();
    session.set_study_type(args.study_type);
    if let Some(date) = args.date {
        session.set_study_date(date);
    }
    session.select_patient(patient)?;

    image::inspect_image(&args.image).context(image::LOAD_FAILED)?;
    session.attach_image(&args.image)?;
    session.set_comments(args.comments);

    let mut analysis = config.analysis.clone();
    if args.seed.is_some() {
        analysis.seed = args.seed;
    }
    analysis.validate()?;

    let rng = analysis.rng();
    let completion_delay = analysis.completion_delay();
    let mut driver = AnalysisDriver::new(session, analysis);

    info!("{}", STATUS_PREPARING);
    let mut progress = driver.start(rng).await?;

    loop {
        tokio::select! {
            tick = progress.recv() => match tick {
                Some(tick) => info!("[{:>3}%] {}", tick.value, tick.status_text()),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, canceling analysis");
                driver.cancel().await?;
                bail!("analysis canceled");
            }
        }
    }
    driver.wait().await;
    tokio::time::sleep(completion_delay).await;

    let session = driver.session();
    let session = session.lock().await;
    let (Some(outcome), Some(report)) = (session.outcome(), session.report()) else {
        bail!("analysis did not complete (state {})", session.state());
    };

    let study_card =
        ReportTemplateEngine::study_card(patient, session.study_type(), session.study_date());

    if args.json {
        let value = serde_json::json!({
            "session_id": session.id(),
            "patient": patient,
            "study_type": session.study_type().label(),
            "study_date": session.study_date(),
            "gallery": session.gallery(),
            "outcome": outcome,
            "headline": ReportTemplateEngine::headline(outcome),
            "summary": ReportTemplateEngine::summary(outcome),
            "report": report,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        writeln!(out, "{}\n", study_card)?;
        writeln!(out, "{}", ReportTemplateEngine::headline(outcome))?;
        writeln!(out, "{}\n", ReportTemplateEngine::summary(outcome))?;
        writeln!(out, "{}", report)?;
    }

    if let Some(explicit) = args.export {
        let path =
            export::resolve_export_path(explicit.as_deref(), &config.export.output_dir, &patient.name);
        let document = ReportTemplateEngine::export_document(&patient.name, outcome, report);
        export::write_report(&path, &document)?;
        if args.json {
            info!("Report exported to {}", path.display());
        } else {
            writeln!(out, "\nЗаключение сохранено: {}", path.display())?;
        }
    }

    Ok(())
}
