use crate::generator::interview::types::InterviewState;
use crate::generator::memory::MemoryScope;
use crate::generator::step_forward_agent::{LLMCallMode, PromptTemplate, StepForwardAgent};

/// 章节撰写者 - 将一次访谈的资料整理为报告章节
#[derive(Default)]
pub struct SectionWriter;

impl StepForwardAgent for SectionWriter {
    type Input = InterviewState;
    type Output = String;

    fn agent_type(&self) -> String {
        "section_writer".to_string()
    }

    fn memory_scope_key(&self) -> String {
        MemoryScope::INTERVIEWS.to_string()
    }

    fn memory_key(&self, input: &InterviewState) -> String {
        format!("{}/{}", self.agent_type(), input.analyst.name)
    }

    fn should_follow_target_language(&self) -> bool {
        true
    }

    fn prompt_template(&self, input: &InterviewState) -> PromptTemplate {
        PromptTemplate {
            system_prompt: format!(
                r#"You are an expert technical writer.

Your task is to create a short, easily digestible section of a report based on a set of source documents.

1. Analyze the content of the source documents:
- The name of each source document is at the start of the document, with the <Document tag.

2. Create a report structure using markdown formatting:
- Use ## for the section title
- Use ### for sub-section headers

3. Write the report following this structure:
a. Title (## header)
b. Summary (### header)
c. Sources (### header)

4. Make your title engaging based upon the focus area of the analyst:
{focus}

5. For the summary section:
- Set up summary with general background / context related to the focus area of the analyst
- Emphasize what is novel, interesting, or surprising about insights gathered from the interview
- Create a numbered list of source documents, as you use them
- Do not mention the names of interviewers or experts
- Aim for approximately 400 words maximum
- Use numbered sources in your report (e.g., [1], [2]) based on information from source documents

6. In the Sources section:
- Include all sources used in your report
- Provide full links to relevant websites or specific document paths
- Separate each source by a newline. Use two spaces at the end of each line to create a newline in Markdown.
- Do not include duplicate sources

7. Final review:
- Ensure the report follows the required structure
- Include no preamble before the title of the report
- Check that all guidelines have been followed"#,
                focus = input.analyst.description,
            ),
            user_prompt: format!(
                "Use this source to write your section: {}",
                input.joined_context()
            ),
            llm_call_mode: LLMCallMode::Prompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::analysts::types::Analyst;

    #[test]
    fn test_prompt_uses_focus_and_gathered_context() {
        let mut state = InterviewState::new(
            Analyst {
                affiliation: "Lab".to_string(),
                name: "Ada".to_string(),
                role: "Researcher".to_string(),
                description: "Supply chain risks".to_string(),
            },
            "chips",
            1,
        );
        state.context.push("<Document href=\"u\"/>\nc\n</Document>".to_string());

        let template = SectionWriter.prompt_template(&state);
        assert!(template.system_prompt.contains("Supply chain risks"));
        assert_eq!(
            template.user_prompt,
            "Use this source to write your section: <Document href=\"u\"/>\nc\n</Document>"
        );
        assert!(SectionWriter.should_follow_target_language());
    }
}
