use std::collections::VecDeque;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::generator::analysts::types::Analyst;

/// 表示“认可当前团队”的反馈口令
pub const APPROVE_TOKEN: &str = "continue";

/// 人工审核后的流向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalystRoute {
    /// 根据反馈重新生成分析师
    CreateAnalysts,
    /// 结束审核，进入访谈
    End,
}

/// 反馈非空且不是认可口令时重新生成团队
pub fn should_continue(feedback: Option<&str>) -> AnalystRoute {
    match feedback.map(str::trim) {
        Some(text) if !text.is_empty() && text != APPROVE_TOKEN => AnalystRoute::CreateAnalysts,
        _ => AnalystRoute::End,
    }
}

/// 人工反馈的来源
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    /// 返回 `None` 表示当前没有可用反馈
    async fn request_feedback(&self, topic: &str, analysts: &[Analyst]) -> Result<Option<String>>;
}

/// 终端交互式反馈
pub struct StdinFeedback;

#[async_trait]
impl FeedbackProvider for StdinFeedback {
    async fn request_feedback(&self, topic: &str, analysts: &[Analyst]) -> Result<Option<String>> {
        println!("\n{}", format_roster(topic, analysts));
        print!("✍️ 输入修改意见（直接回车或输入 `continue` 以认可团队）: ");
        tokio::io::stdout()
            .flush()
            .await
            .context("Failed to flush stdout")?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let line = lines
            .next_line()
            .await
            .context("Failed to read feedback from stdin")?;
        Ok(line)
    }
}

/// 预先给定的反馈队列，耗尽后不再提供反馈
pub struct ScriptedFeedback {
    queue: Mutex<VecDeque<String>>,
}

impl ScriptedFeedback {
    pub fn new(feedback: impl IntoIterator<Item = String>) -> Self {
        Self {
            queue: Mutex::new(feedback.into_iter().collect()),
        }
    }
}

#[async_trait]
impl FeedbackProvider for ScriptedFeedback {
    async fn request_feedback(&self, _topic: &str, _analysts: &[Analyst]) -> Result<Option<String>> {
        Ok(self.queue.lock().await.pop_front())
    }
}

/// 无人值守时直接认可团队
pub struct AutoApprove;

#[async_trait]
impl FeedbackProvider for AutoApprove {
    async fn request_feedback(&self, _topic: &str, _analysts: &[Analyst]) -> Result<Option<String>> {
        Ok(Some(APPROVE_TOKEN.to_string()))
    }
}

/// 根据配置选择反馈来源
pub fn provider_for(config: &Config) -> Box<dyn FeedbackProvider> {
    if config.interactive {
        Box::new(StdinFeedback)
    } else if !config.human_feedback.is_empty() || config.interrupt_before_feedback {
        Box::new(ScriptedFeedback::new(config.human_feedback.clone()))
    } else {
        Box::new(AutoApprove)
    }
}

/// 以列表形式展示分析师团队
pub fn format_roster(topic: &str, analysts: &[Analyst]) -> String {
    let mut roster = format!("👥 调研主题「{}」的分析师团队:\n", topic);
    for (index, analyst) in analysts.iter().enumerate() {
        roster.push_str(&format!(
            "  {}. {} - {} ({})\n     {}\n",
            index + 1,
            analyst.name,
            analyst.role,
            analyst.affiliation,
            analyst.description
        ));
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_continue_routes() {
        assert_eq!(should_continue(None), AnalystRoute::End);
        assert_eq!(should_continue(Some("")), AnalystRoute::End);
        assert_eq!(should_continue(Some("   ")), AnalystRoute::End);
        assert_eq!(should_continue(Some("continue")), AnalystRoute::End);
        assert_eq!(should_continue(Some(" continue\n")), AnalystRoute::End);
        assert_eq!(
            should_continue(Some("Add someone from a startup")),
            AnalystRoute::CreateAnalysts
        );
        assert_eq!(
            should_continue(Some("Continue")),
            AnalystRoute::CreateAnalysts
        );
    }

    #[tokio::test]
    async fn test_scripted_feedback_drains_then_none() {
        let provider = ScriptedFeedback::new(vec!["more ethics".to_string(), "continue".to_string()]);
        assert_eq!(
            provider.request_feedback("t", &[]).await.unwrap().as_deref(),
            Some("more ethics")
        );
        assert_eq!(
            provider.request_feedback("t", &[]).await.unwrap().as_deref(),
            Some("continue")
        );
        assert_eq!(provider.request_feedback("t", &[]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_auto_approve_always_approves() {
        let feedback = AutoApprove.request_feedback("t", &[]).await.unwrap();
        assert_eq!(should_continue(feedback.as_deref()), AnalystRoute::End);
    }

    #[test]
    fn test_format_roster_lists_every_analyst() {
        let analysts = vec![
            Analyst {
                affiliation: "A1".to_string(),
                name: "N1".to_string(),
                role: "R1".to_string(),
                description: "D1".to_string(),
            },
            Analyst {
                affiliation: "A2".to_string(),
                name: "N2".to_string(),
                role: "R2".to_string(),
                description: "D2".to_string(),
            },
        ];
        let roster = format_roster("topic", &analysts);
        assert!(roster.contains("1. N1 - R1 (A1)"));
        assert!(roster.contains("2. N2 - R2 (A2)"));
    }
}
