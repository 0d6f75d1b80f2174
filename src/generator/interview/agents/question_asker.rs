use crate::generator::interview::types::{FAREWELL_PHRASE, InterviewState};
use crate::generator::memory::MemoryScope;
use crate::generator::step_forward_agent::{LLMCallMode, PromptTemplate, StepForwardAgent};

/// 提问者 - 以分析师身份向专家提问
#[derive(Default)]
pub struct QuestionAsker;

impl StepForwardAgent for QuestionAsker {
    type Input = InterviewState;
    type Output = String;

    fn agent_type(&self) -> String {
        "question_asker".to_string()
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
            system_prompt: format!(
                r#"You are an analyst tasked with interviewing an expert to learn about a specific topic.

Your goal is to boil down to interesting and specific insights related to your topic.

1. Interesting: Insights that people will find surprising or non-obvious.

2. Specific: Insights that avoid generalities and include specific examples from the expert.

Here is your topic of focus and set of goals:
{goals}

Begin by introducing yourself using a name that fits your persona, and then ask your question.

Continue to ask questions to drill down and refine your understanding of the topic.

When you are satisfied with your understanding, complete the interview with: "{farewell}!"

Remember to stay in character throughout your response, reflecting the persona and goals provided to you."#,
                goals = input.analyst.persona(),
                farewell = FAREWELL_PHRASE,
            ),
            user_prompt: format!(
                "Here is the interview so far:\n\n{}\n\nReply with your next message to the expert only.",
                input.transcript()
            ),
            llm_call_mode: LLMCallMode::Prompt,
        }
    }
}
