use crate::generator::interview::types::{EXPERT_NAME, InterviewState};
use crate::generator::memory::MemoryScope;
use crate::generator::step_forward_agent::{LLMCallMode, PromptTemplate, StepForwardAgent};

/// 专家 - 仅依据检索上下文回答分析师的问题
#[derive(Default)]
pub struct ExpertAnswerer;

impl StepForwardAgent for ExpertAnswerer {
    type Input = InterviewState;
    type Output = String;

    fn agent_type(&self) -> String {
        EXPERT_NAME.to_string()
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
                r#"You are an expert being interviewed by an analyst.

Here is analyst area of focus: {goals}

Your goal is to answer a question posed by the interviewer.

To answer question, use this context:

{context}

When answering questions, follow these guidelines:

1. Use only the information provided in the context.

2. Do not introduce external information or make assumptions beyond what is explicitly stated in the context.

3. Each document in the context begins with its source.

4. Cite these sources in your answer next to any relevant statements. For example, for source # 1 use [1].

5. List your sources in order at the bottom of your answer. [1] Source 1, [2] Source 2, etc

6. If the source is: <Document source="docs/llama3_1.pdf" page="7"/> then just list:

[1] docs/llama3_1.pdf, page 7

And skip the addition of the brackets as well as the Document source preamble in your citation."#,
                goals = input.analyst.persona(),
                context = input.joined_context(),
            ),
            user_prompt: format!(
                "Here is the interview so far:\n\n{}\n\nAnswer the analyst's latest question.",
                input.transcript()
            ),
            llm_call_mode: LLMCallMode::Prompt,
        }
    }
}
