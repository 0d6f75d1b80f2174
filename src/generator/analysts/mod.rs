// 分析师团队：根据主题生成画像，经人工审核后确定访谈阵容

use anyhow::Result;

use crate::generator::analysts::agents::analyst_creator::AnalystCreator;
use crate::generator::analysts::types::{Analyst, AnalystRequest};
use crate::generator::context::GeneratorContext;
use crate::generator::step_forward_agent::StepForwardAgent;

pub(crate) mod agents;
pub mod feedback;
pub mod types;

/// 生成分析师团队
pub async fn create_analysts(
    context: &GeneratorContext,
    topic: &str,
    max_analysts: usize,
    human_feedback: Option<&str>,
) -> Result<Vec<Analyst>> {
    println!("🧑‍🔬 正在组建分析师团队（最多{}位）...", max_analysts);

    let request = AnalystRequest {
        topic: topic.to_string(),
        max_analysts,
        human_feedback: human_feedback.map(str::to_string),
    };
    let team = AnalystCreator.execute(context, &request).await?;

    println!("✓ 已生成{}位分析师", team.analysts.len());
    Ok(team.analysts)
}
