use anyhow::{Result, anyhow};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::generator::agent_executor::{AgentExecuteParams, extract, prompt};
use crate::generator::context::GeneratorContext;

/// LLM调用方式配置
#[derive(Debug, Clone, PartialEq)]
pub enum LLMCallMode {
    /// 使用extract方法，返回特定要求的结构化数据
    Extract,
    /// 使用prompt方法，返回自由文本
    Prompt,
}

/// Prompt模板配置
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// 系统提示词
    pub system_prompt: String,
    /// 用户提示词
    pub user_prompt: String,
    /// LLM调用方式
    pub llm_call_mode: LLMCallMode,
}

/// 工作流中的单步Agent：由输入渲染prompt，调用模型，并把结果写入Memory
#[async_trait]
pub trait StepForwardAgent: Send + Sync {
    /// 渲染prompt所需的输入
    type Input: Send + Sync;

    /// Agent的输出类型 - 必须支持JSON序列化
    type Output: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static;

    /// Agent类型标识
    fn agent_type(&self) -> String;

    fn memory_scope_key(&self) -> String;

    /// 本次输出在Memory中的键，默认与Agent类型一致
    fn memory_key(&self, _input: &Self::Input) -> String {
        self.agent_type()
    }

    /// Prompt模板配置
    fn prompt_template(&self, input: &Self::Input) -> PromptTemplate;

    /// 是否在系统提示词后追加目标语言指令，仅面向读者的写作类Agent需要
    fn should_follow_target_language(&self) -> bool {
        false
    }

    /// 可选的后处理钩子
    fn post_process(&self, result: Self::Output, _input: &Self::Input) -> Result<Self::Output> {
        Ok(result)
    }

    /// 渲染本次调用的参数，写作类Agent会追加目标语言指令
    fn execute_params(
        &self,
        context: &GeneratorContext,
        input: &Self::Input,
    ) -> (AgentExecuteParams, LLMCallMode) {
        let mut template = self.prompt_template(input);

        if self.should_follow_target_language() {
            let language_instruction = context.config.target_language.prompt_instruction();
            template.system_prompt =
                format!("{}\n\n{}", template.system_prompt, language_instruction);
        }

        let params = AgentExecuteParams {
            prompt_sys: template.system_prompt,
            prompt_user: template.user_prompt,
            cache_scope: format!("{}/{}", self.memory_scope_key(), self.agent_type()),
            log_tag: self.agent_type(),
        };
        (params, template.llm_call_mode)
    }

    /// 默认实现的execute方法
    async fn execute(&self, context: &GeneratorContext, input: &Self::Input) -> Result<Self::Output> {
        let (params, llm_call_mode) = self.execute_params(context, input);

        let result_value = match llm_call_mode {
            LLMCallMode::Extract => {
                let result: Self::Output = extract(context, params).await?;
                serde_json::to_value(&result)?
            }
            LLMCallMode::Prompt => {
                let result_text: String = prompt(context, params).await?;
                serde_json::to_value(&result_text)?
            }
        };

        let typed_result = serde_json::from_value::<Self::Output>(result_value).map_err(|e| {
            anyhow!("Sub-Agent [{}] 输出无法转换为目标类型: {}", self.agent_type(), e)
        })?;
        let typed_result = self.post_process(typed_result, input)?;

        context
            .store_to_memory(
                &self.memory_scope_key(),
                &self.memory_key(input),
                &typed_result,
            )
            .await?;

        tracing::debug!("✅ Sub-Agent [{}]执行完成", self.agent_type());
        Ok(typed_result)
    }
}
