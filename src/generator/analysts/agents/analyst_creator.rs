use anyhow::{Result, anyhow};

use crate::generator::analysts::types::{AnalystRequest, AnalystTeam};
use crate::generator::memory::MemoryScope;
use crate::generator::step_forward_agent::{LLMCallMode, PromptTemplate, StepForwardAgent};

/// 分析师团队生成器 - 根据调研主题与人工反馈创建一组分析师画像
#[derive(Default)]
pub struct AnalystCreator;

impl StepForwardAgent for AnalystCreator {
    type Input = AnalystRequest;
    type Output = AnalystTeam;

    fn agent_type(&self) -> String {
        "analyst_creator".to_string()
    }

    fn memory_scope_key(&self) -> String {
        MemoryScope::ANALYSTS.to_string()
    }

    fn prompt_template(&self, input: &AnalystRequest) -> PromptTemplate {
        PromptTemplate {
            system_prompt: format!(
                r#"You are tasked with creating a set of AI analyst personas. Follow these instructions carefully:

1. First, review the research topic:
{topic}

2. Examine any editorial feedback that has been optionally provided to guide creation of the analysts:
{feedback}

3. Determine the most interesting themes based upon the documents and/or feedback above.

4. Pick the top {max_analysts} themes.

5. Assign one analyst to each theme."#,
                topic = input.topic,
                feedback = input.human_feedback.as_deref().unwrap_or(""),
                max_analysts = input.max_analysts,
            ),
            user_prompt: "Generate the set of analysts.".to_string(),
            llm_call_mode: LLMCallMode::Extract,
        }
    }

    fn post_process(&self, mut result: AnalystTeam, input: &AnalystRequest) -> Result<AnalystTeam> {
        if result.analysts.is_empty() {
            return Err(anyhow!("模型未生成任何分析师"));
        }
        if result.analysts.len() > input.max_analysts {
            tracing::debug!(
                "模型生成了{}位分析师，截取前{}位",
                result.analysts.len(),
                input.max_analysts
            );
            result.analysts.truncate(input.max_analysts);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::analysts::types::Analyst;

    fn analyst(name: &str) -> Analyst {
        Analyst {
            affiliation: "Lab".to_string(),
            name: name.to_string(),
            role: "Researcher".to_string(),
            description: "Curious".to_string(),
        }
    }

    fn request(feedback: Option<&str>) -> AnalystRequest {
        AnalystRequest {
            topic: "Quantum networking".to_string(),
            max_analysts: 2,
            human_feedback: feedback.map(str::to_string),
        }
    }

    #[test]
    fn test_prompt_contains_topic_feedback_and_limit() {
        let template = AnalystCreator.prompt_template(&request(Some("Add a regulator")));
        assert!(template.system_prompt.contains("Quantum networking"));
        assert!(template.system_prompt.contains("Add a regulator"));
        assert!(template.system_prompt.contains("Pick the top 2 themes"));
        assert_eq!(template.llm_call_mode, LLMCallMode::Extract);
    }

    #[test]
    fn test_post_process_truncates_to_max() {
        let team = AnalystTeam {
            analysts: vec![analyst("a"), analyst("b"), analyst("c")],
        };
        let result = AnalystCreator.post_process(team, &request(None)).unwrap();
        assert_eq!(result.analysts.len(), 2);
        assert_eq!(result.analysts[1].name, "b");
    }

    #[test]
    fn test_post_process_rejects_empty_team() {
        let result = AnalystCreator.post_process(AnalystTeam::default(), &request(None));
        assert!(result.is_err());
    }
}
