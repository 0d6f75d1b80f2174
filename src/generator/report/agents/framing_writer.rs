use crate::generator::memory::MemoryScope;
use crate::generator::report::types::ReportInput;
use crate::generator::step_forward_agent::{LLMCallMode, PromptTemplate, StepForwardAgent};

/// 报告首尾部分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingPart {
    Introduction,
    Conclusion,
}

/// 引言与结论撰写者
pub struct FramingWriter {
    part: FramingPart,
}

impl FramingWriter {
    pub fn new(part: FramingPart) -> Self {
        Self { part }
    }
}

impl StepForwardAgent for FramingWriter {
    type Input = ReportInput;
    type Output = String;

    fn agent_type(&self) -> String {
        match self.part {
            FramingPart::Introduction => "introduction_writer".to_string(),
            FramingPart::Conclusion => "conclusion_writer".to_string(),
        }
    }

    fn memory_scope_key(&self) -> String {
        MemoryScope::REPORT.to_string()
    }

    fn should_follow_target_language(&self) -> bool {
        true
    }

    fn prompt_template(&self, input: &ReportInput) -> PromptTemplate {
        let (task, header) = match self.part {
            FramingPart::Introduction => (
                "Write the report introduction. Create a compelling title and use the # header for the title. Use ## Introduction as the section header.",
                "introduction",
            ),
            FramingPart::Conclusion => (
                "Write the report conclusion. Use ## Conclusion as the section header.",
                "conclusion",
            ),
        };

        PromptTemplate {
            system_prompt: format!(
                r#"You are a technical writer finishing a report on {topic}

You will be given all of the sections of the report.

Your job is to write a crisp and compelling {header} section.

The user will instruct you whether to write the introduction or conclusion.

Include no pre-amble for either section.

Target around 100 words, crisply previewing (for introduction) or recapping (for conclusion) all of the sections of the report.

Use markdown formatting."#,
                topic = input.topic,
                header = header,
            ),
            user_prompt: format!(
                "{}\n\nHere are the sections to reflect on for writing:\n\n{}",
                task,
                input.formatted_sections()
            ),
            llm_call_mode: LLMCallMode::Prompt,
        }
    }
}
