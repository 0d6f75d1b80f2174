use serde::{Deserialize, Serialize};

const INSIGHTS_HEADING: &str = "## Insights";
const SOURCES_DELIMITER: &str = "\n## Sources\n";
const PART_SEPARATOR: &str = "\n\n---\n\n";

/// 最终报告
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub introduction: String,
    /// 去掉 `## Insights` 标题后的正文
    pub content: String,
    pub conclusion: String,
    pub sources: Option<String>,
}

/// 报告写作阶段的输入
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub topic: String,
    pub sections: Vec<String>,
}

impl ReportInput {
    pub fn formatted_sections(&self) -> String {
        self.sections.join("\n\n")
    }
}

impl Report {
    /// 渲染为完整的Markdown文档
    pub fn render(&self) -> String {
        let mut rendered = format!(
            "{}{}{}{}{}",
            self.introduction, PART_SEPARATOR, self.content, PART_SEPARATOR, self.conclusion
        );
        if let Some(sources) = &self.sources {
            rendered.push_str("\n\n## Sources\n");
            rendered.push_str(sources);
        }
        rendered
    }
}

/// 组装报告：去掉正文开头的 `## Insights`，并拆出来源列表
pub fn finalize_report(introduction: &str, content: &str, conclusion: &str) -> Report {
    let content = content.strip_prefix(INSIGHTS_HEADING).unwrap_or(content);
    let content = content.trim_start();

    let (body, sources) = match content.split_once(SOURCES_DELIMITER) {
        Some((body, sources)) => (body, Some(sources.to_string())),
        None => (content, None),
    };

    Report {
        introduction: introduction.to_string(),
        content: body.to_string(),
        conclusion: conclusion.to_string(),
        sources,
    }
}
