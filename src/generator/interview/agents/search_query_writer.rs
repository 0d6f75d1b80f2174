use anyhow::Result;

use crate::generator::interview::types::{InterviewState, SearchQuery};
use crate::generator::memory::MemoryScope;
use crate::generator::step_forward_agent::{LLMCallMode, PromptTemplate, StepForwardAgent};

/// 检索目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Web,
    KnowledgeBase,
}

/// 检索查询生成器 - 将对话中的最新问题改写为检索语句
pub struct SearchQueryWriter {
    target: SearchTarget,
}

impl SearchQueryWriter {
    pub fn new(target: SearchTarget) -> Self {
        Self { target }
    }
}

impl StepForwardAgent for SearchQueryWriter {
    type Input = InterviewState;
    type Output = SearchQuery;

    fn agent_type(&self) -> String {
        match self.target {
            SearchTarget::Web => "web_query_writer".to_string(),
            SearchTarget::KnowledgeBase => "wiki_query_writer".to_string(),
        }
    }

    fn memory_scope_key(&self) -> String {
        MemoryScope::INTERVIEWS.to_string()
    }

    fn memory_key(&self, input: &InterviewState) -> String {
        format!(
            "{}/{}#{}",
            self.agent_type(),
            input.analyst.name,
            input.messages.len()
        )
    }

    fn prompt_template(&self, input: &InterviewState) -> PromptTemplate {
        PromptTemplate {
            system_prompt: r#"You will be given a conversation between an analyst and an expert.

Your goal is to generate a well-structured query for use in retrieval and / or web-search related to the conversation.

First, analyze the full conversation.

Pay particular attention to the final question posed by the analyst.

Convert this final question into a well-structured web search query."#
                .to_string(),
            user_prompt: input.transcript(),
            llm_call_mode: LLMCallMode::Extract,
        }
    }

    fn post_process(&self, mut result: SearchQuery, _input: &InterviewState) -> Result<SearchQuery> {
        result.search_query = result.search_query.trim().to_string();
        Ok(result)
    }
}
