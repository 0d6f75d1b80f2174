//! 检查点：持久化调研状态，支持在人工审核前中断并在之后恢复

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::generator::analysts::types::Analyst;
use crate::generator::interview::types::InterviewState;
use crate::generator::report::types::Report;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint `{0}` not found")]
    NotFound(String),
    #[error("invalid thread id `{0}`")]
    InvalidThreadId(String),
    #[error("checkpoint I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("checkpoint is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// 调研进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResearchStage {
    /// 尚未生成分析师
    Pending,
    /// 分析师已生成，等待人工反馈
    AwaitingFeedback,
    /// 分析师团队已确认
    AnalystsApproved,
    /// 访谈与章节已完成
    InterviewsConducted,
    /// 报告已完成
    ReportWritten,
}

/// 一条调研线程的完整状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchState {
    pub thread_id: String,
    pub topic: String,
    pub max_analysts: usize,
    pub stage: ResearchStage,
    #[serde(default)]
    pub analysts: Vec<Analyst>,
    /// 下一次生成分析师时使用的反馈
    #[serde(default)]
    pub pending_feedback: Option<String>,
    #[serde(default)]
    pub feedback_history: Vec<String>,
    #[serde(default)]
    pub feedback_rounds: usize,
    #[serde(default)]
    pub interviews: Vec<InterviewState>,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub report: Option<Report>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResearchState {
    pub fn new(topic: impl Into<String>, max_analysts: usize) -> Self {
        let now = Utc::now();
        Self {
            thread_id: uuid::Uuid::new_v4().to_string(),
            topic: topic.into(),
            max_analysts,
            stage: ResearchStage::Pending,
            analysts: Vec::new(),
            pending_feedback: None,
            feedback_history: Vec::new(),
            feedback_rounds: 0,
            interviews: Vec::new(),
            sections: Vec::new(),
            report: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 记录一条修改意见，下一轮生成分析师时使用
    pub fn record_feedback(&mut self, feedback: &str) {
        self.feedback_history.push(feedback.to_string());
        self.pending_feedback = Some(feedback.to_string());
        self.feedback_rounds += 1;
    }
}

/// 基于JSON文件的检查点存储
pub struct Checkpointer {
    dir: PathBuf,
}

impl Checkpointer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 线程ID只允许字母、数字、`-` 与 `_`，不能逃出检查点目录
    fn path_for(&self, thread_id: &str) -> Result<PathBuf, CheckpointError> {
        let valid = !thread_id.is_empty()
            && thread_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(CheckpointError::InvalidThreadId(thread_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", thread_id)))
    }

    /// 保存状态并刷新更新时间
    pub async fn save(&self, state: &mut ResearchState) -> Result<PathBuf, CheckpointError> {
        state.updated_at = Utc::now();
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(&state.thread_id)?;
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content).await?;

        tracing::debug!("💾 检查点已保存: {}", path.display());
        Ok(path)
    }

    pub async fn load(&self, thread_id: &str) -> Result<ResearchState, CheckpointError> {
        let path = self.path_for(thread_id)?;
        if !fs::try_exists(&path).await? {
            return Err(CheckpointError::NotFound(thread_id.to_string()));
        }

        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 列出所有线程ID，按名称排序
    pub async fn list(&self) -> Result<Vec<String>, CheckpointError> {
        if !fs::try_exists(&self.dir).await? {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}
