// 访谈阶段：每位分析师与专家进行多轮问答，专家依据网页与知识库检索结果作答，
// 访谈结束后将资料整理成报告章节。各分析师的访谈并发执行。

use anyhow::{Result, anyhow};

use crate::generator::analysts::types::Analyst;
use crate::generator::context::GeneratorContext;
use crate::generator::interview::agents::expert_answerer::ExpertAnswerer;
use crate::generator::interview::agents::question_asker::QuestionAsker;
use crate::generator::interview::agents::search_query_writer::{SearchQueryWriter, SearchTarget};
use crate::generator::interview::agents::section_writer::SectionWriter;
use crate::generator::interview::router::{InterviewRoute, route_messages};
use crate::generator::interview::types::{EXPERT_NAME, InterviewMessage, InterviewState};
use crate::generator::search::search_best_effort;
use crate::generator::step_forward_agent::StepForwardAgent;
use crate::utils::threads::do_parallel_with_limit;

mod agents;
pub mod router;
pub mod types;

/// 分析师提出下一个问题
pub async fn generate_question(context: &GeneratorContext, state: &mut InterviewState) -> Result<()> {
    let question = QuestionAsker.execute(context, state).await?;
    state.messages.push(InterviewMessage::ai(question));
    Ok(())
}

/// 网页检索，失败时追加空上下文
pub async fn search_web(context: &GeneratorContext, state: &InterviewState) -> Result<String> {
    let query = SearchQueryWriter::new(SearchTarget::Web)
        .execute(context, state)
        .await?;
    Ok(search_best_effort(context.web_search.as_ref(), &query.search_query).await)
}

/// 知识库检索，失败时追加空上下文
pub async fn search_wikipedia(context: &GeneratorContext, state: &InterviewState) -> Result<String> {
    let query = SearchQueryWriter::new(SearchTarget::KnowledgeBase)
        .execute(context, state)
        .await?;
    Ok(search_best_effort(context.knowledge_base.as_ref(), &query.search_query).await)
}

/// 专家作答
pub async fn generate_answer(context: &GeneratorContext, state: &mut InterviewState) -> Result<()> {
    let answer = ExpertAnswerer.execute(context, state).await?;
    state.messages.push(InterviewMessage::expert(answer));
    Ok(())
}

/// 保存访谈全文
pub fn save_interview(state: &mut InterviewState) {
    state.interview = state.transcript();
}

/// 根据访谈资料撰写章节
pub async fn write_section(context: &GeneratorContext, state: &mut InterviewState) -> Result<()> {
    let section = SectionWriter.execute(context, state).await?;
    state.sections.push(section);
    Ok(())
}

/// 完成一位分析师的整场访谈
pub async fn conduct_interview(
    context: &GeneratorContext,
    topic: &str,
    analyst: &Analyst,
) -> Result<InterviewState> {
    let mut state = InterviewState::new(analyst.clone(), topic, context.config.max_num_turns);

    loop {
        generate_question(context, &mut state).await?;

        let (web, wiki) = tokio::join!(search_web(context, &state), search_wikipedia(context, &state));
        state.context.push(web?);
        state.context.push(wiki?);

        generate_answer(context, &mut state).await?;
        tracing::debug!(
            "   💬 [{}] 完成第{}轮问答",
            analyst.name,
            state.expert_turns()
        );

        if route_messages(&state.messages, state.max_num_turns, EXPERT_NAME)
            == InterviewRoute::SaveInterview
        {
            break;
        }
    }

    save_interview(&mut state);
    write_section(context, &mut state).await?;
    Ok(state)
}

/// 并发执行所有分析师的访谈，结果按分析师顺序返回
pub async fn conduct_interviews(
    context: &GeneratorContext,
    topic: &str,
    analysts: &[Analyst],
) -> Result<Vec<InterviewState>> {
    let max_parallels = context.config.llm.max_parallels;
    println!(
        "🎙️ 开始{}场访谈，最大并发数：{}",
        analysts.len(),
        max_parallels
    );

    let interview_futures: Vec<_> = analysts
        .iter()
        .map(|analyst| {
            let analyst = analyst.clone();
            let context = context.clone();
            let topic = topic.to_string();
            Box::pin(async move {
                let result = conduct_interview(&context, &topic, &analyst).await;
                (analyst.name, result)
            })
        })
        .collect();

    let results = do_parallel_with_limit(interview_futures, max_parallels).await;

    let mut interviews = Vec::with_capacity(results.len());
    for (name, result) in results {
        match result {
            Ok(state) => {
                println!("✅ 访谈完成：{}（{}轮问答）", name, state.expert_turns());
                interviews.push(state);
            }
            Err(e) => {
                println!("⚠️ 访谈失败：{}: {}", name, e);
                tracing::warn!("interview with {} failed: {:#}", name, e);
            }
        }
    }

    if interviews.is_empty() {
        return Err(anyhow!("所有访谈都失败了"));
    }

    Ok(interviews)
}

#[cfg(test)]
mod tests;
