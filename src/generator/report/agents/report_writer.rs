use crate::generator::memory::MemoryScope;
use crate::generator::report::types::ReportInput;
use crate::generator::step_forward_agent::{LLMCallMode, PromptTemplate, StepForwardAgent};

/// 报告撰写者 - 将各章节整合为报告正文
#[derive(Default)]
pub struct ReportWriter;

impl StepForwardAgent for ReportWriter {
    type Input = ReportInput;
    type Output = String;

    fn agent_type(&self) -> String {
        "report_writer".to_string()
    }

    fn memory_scope_key(&self) -> String {
        MemoryScope::REPORT.to_string()
    }

    fn should_follow_target_language(&self) -> bool {
        true
    }

    fn prompt_template(&self, input: &ReportInput) -> PromptTemplate {
        PromptTemplate {
            system_prompt: format!(
                r#"You are a technical writer creating a report on this overall topic:

{topic}

You have a team of analysts. Each analyst has done two things:

1. They conducted an interview with an expert on a specific sub-topic.
2. They wrote up their findings into a memo.

Your task:

1. You will be given a collection of memos from your analysts.
2. Think carefully about the insights from each memo.
3. Consolidate these into a crisp overall summary that ties together the central ideas from all of the memos.
4. Summarize the central points in each memo into a cohesive single narrative.

To format your report:

1. Use markdown formatting.
2. Include no pre-amble for the report.
3. Use no sub-heading.
4. Start your report with a single title header: ## Insights
5. Do not mention any analyst names in your report.
6. Preserve any citations in the memos, which will be annotated in brackets, for example [1] or [2].
7. Create a final, consolidated list of sources and add to a Sources section with the `## Sources` header.
8. List your sources in order and do not repeat.

[1] Source 1
[2] Source 2"#,
                topic = input.topic,
            ),
            user_prompt: format!(
                "Here are the memos from your analysts to build your report from:\n\n{}",
                input.formatted_sections()
            ),
            llm_call_mode: LLMCallMode::Prompt,
        }
    }
}
