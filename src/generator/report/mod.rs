use anyhow::{Result, anyhow};

use crate::generator::context::GeneratorContext;
use crate::generator::report::agents::framing_writer::{FramingPart, FramingWriter};
use crate::generator::report::agents::report_writer::ReportWriter;
use crate::generator::report::types::{Report, ReportInput, finalize_report};
use crate::generator::step_forward_agent::StepForwardAgent;

mod agents;
pub mod types;

/// 撰写报告正文
pub async fn write_report(context: &GeneratorContext, input: &ReportInput) -> Result<String> {
    ReportWriter.execute(context, input).await
}

/// 撰写引言
pub async fn write_introduction(context: &GeneratorContext, input: &ReportInput) -> Result<String> {
    FramingWriter::new(FramingPart::Introduction)
        .execute(context, input)
        .await
}

/// 撰写结论
pub async fn write_conclusion(context: &GeneratorContext, input: &ReportInput) -> Result<String> {
    FramingWriter::new(FramingPart::Conclusion)
        .execute(context, input)
        .await
}

/// 并发撰写正文、引言与结论，并组装为最终报告
pub async fn compose_report(
    context: &GeneratorContext,
    topic: &str,
    sections: &[String],
) -> Result<Report> {
    if sections.is_empty() {
        return Err(anyhow!("没有可用于撰写报告的章节"));
    }

    println!("📝 正在基于{}个章节撰写报告...", sections.len());
    println!("📝 目标语言: {}", context.config.target_language.display_name());

    let input = ReportInput {
        topic: topic.to_string(),
        sections: sections.to_vec(),
    };

    let (content, introduction, conclusion) = tokio::try_join!(
        write_report(context, &input),
        write_introduction(context, &input),
        write_conclusion(context, &input),
    )?;

    let report = finalize_report(&introduction, &content, &conclusion);
    println!("✓ 报告撰写完成");
    Ok(report)
}
