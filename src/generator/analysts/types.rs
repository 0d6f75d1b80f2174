use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 分析师画像
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Analyst {
    /// Primary affiliation of the analyst
    pub affiliation: String,
    /// Name of the analyst
    pub name: String,
    /// Role of the analyst in the context of the topic
    pub role: String,
    /// Description of the analyst focus, concerns and motives
    pub description: String,
}

impl Analyst {
    /// 渲染为提示词中使用的人设文本
    pub fn persona(&self) -> String {
        format!(
            "Name: {}\nRole: {}\nAffiliation: {}\nDescription: {}\n",
            self.name, self.role, self.affiliation, self.description
        )
    }
}

/// 分析师团队，模型结构化输出的目标类型
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalystTeam {
    /// Comprehensive list of analysts with their roles and affiliations
    pub analysts: Vec<Analyst>,
}

/// 生成分析师团队所需的输入
#[derive(Debug, Clone)]
pub struct AnalystRequest {
    pub topic: String,
    pub max_analysts: usize,
    /// 上一轮的人工反馈
    pub human_feedback: Option<String>,
}
