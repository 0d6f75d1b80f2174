use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::generator::analysts::types::Analyst;

/// 专家回答消息的名称
pub const EXPERT_NAME: &str = "expert";

/// 分析师结束访谈时使用的致谢语
pub const FAREWELL_PHRASE: &str = "Thank you so much for your help";

/// 消息发送方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    Human,
    Ai,
}

/// 访谈中的一条消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewMessage {
    pub speaker: Speaker,
    /// 具名发送方，专家回答为 `expert`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content: String,
}

impl InterviewMessage {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Human,
            name: None,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Ai,
            name: None,
            content: content.into(),
        }
    }

    pub fn expert(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Ai,
            name: Some(EXPERT_NAME.to_string()),
            content: content.into(),
        }
    }

    /// 是否为指定名称的AI消息
    pub fn is_ai_named(&self, name: &str) -> bool {
        self.speaker == Speaker::Ai && self.name.as_deref() == Some(name)
    }

    /// 渲染为对话记录中的一行
    pub fn to_buffer_line(&self) -> String {
        let role = match self.speaker {
            Speaker::Human => "Human",
            Speaker::Ai => "AI",
        };
        match &self.name {
            Some(name) => format!("{} ({}): {}", role, name, self.content),
            None => format!("{}: {}", role, self.content),
        }
    }
}

/// 单个分析师的访谈状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewState {
    pub analyst: Analyst,
    pub messages: Vec<InterviewMessage>,
    /// 检索得到的上下文，每次检索追加一条
    pub context: Vec<String>,
    pub max_num_turns: usize,
    /// 访谈全文
    pub interview: String,
    pub sections: Vec<String>,
}

impl InterviewState {
    /// 以一条点明主题的开场消息开始访谈
    pub fn new(analyst: Analyst, topic: &str, max_num_turns: usize) -> Self {
        let opening = InterviewMessage::human(format!("So you said you were writing an article on {}?", topic));
        Self {
            analyst,
            messages: vec![opening],
            context: Vec::new(),
            max_num_turns,
            interview: String::new(),
            sections: Vec::new(),
        }
    }

    /// 已完成的专家回答数
    pub fn expert_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.is_ai_named(EXPERT_NAME))
            .count()
    }

    /// 渲染为供模型阅读的对话记录
    pub fn transcript(&self) -> String {
        get_buffer_string(&self.messages)
    }

    /// 拼接检索上下文
    pub fn joined_context(&self) -> String {
        self.context
            .iter()
            .filter(|c| !c.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// 将消息序列渲染为逐行的对话文本
pub fn get_buffer_string(messages: &[InterviewMessage]) -> String {
    messages
        .iter()
        .map(InterviewMessage::to_buffer_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// 检索查询，模型结构化输出的目标类型
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchQuery {
    /// Search query for the retrieval
    #[serde(default)]
    pub search_query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyst() -> Analyst {
        Analyst {
            affiliation: "Lab".to_string(),
            name: "Ada".to_string(),
            role: "Researcher".to_string(),
            description: "Curious".to_string(),
        }
    }

    #[test]
    fn test_buffer_string_rendering() {
        let messages = vec![
            InterviewMessage::human("Hello"),
            InterviewMessage::ai("What is X?"),
            InterviewMessage::expert("X is Y."),
        ];
        assert_eq!(
            get_buffer_string(&messages),
            "Human: Hello\nAI: What is X?\nAI (expert): X is Y."
        );
    }

    #[test]
    fn test_new_state_is_seeded_with_topic() {
        let state = InterviewState::new(analyst(), "solid-state batteries", 2);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].speaker, Speaker::Human);
        assert!(state.messages[0].content.contains("solid-state batteries"));
        assert_eq!(state.expert_turns(), 0);
    }

    #[test]
    fn test_expert_turns_only_counts_named_ai_messages() {
        let mut state = InterviewState::new(analyst(), "t", 3);
        state.messages.push(InterviewMessage::ai("q1"));
        state.messages.push(InterviewMessage::expert("a1"));
        state.messages.push(InterviewMessage::ai("q2"));
        assert_eq!(state.expert_turns(), 1);
    }

    #[test]
    fn test_joined_context_skips_empty_entries() {
        let mut state = InterviewState::new(analyst(), "t", 1);
        state.context = vec!["web".to_string(), String::new(), "wiki".to_string()];
        assert_eq!(state.joined_context(), "web\n\nwiki");
    }
}
