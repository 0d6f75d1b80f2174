use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::checkpoint::ResearchState;
use crate::generator::interview::types::InterviewState;
use crate::i18n::TargetLanguage;

#[allow(async_fn_in_trait)]
pub trait Outlet {
    /// 保存调研产物，返回报告文件路径
    async fn save(&self, state: &ResearchState) -> Result<PathBuf>;
}

/// 输出目录中的文件布局
pub struct DocTree {
    report: String,
    analysts: String,
    interviews: String,
}

impl DocTree {
    pub fn new(target_language: &TargetLanguage) -> Self {
        Self {
            report: target_language.get_output_filename("report"),
            analysts: "analysts.json".to_string(),
            interviews: target_language.get_output_filename("interviews"),
        }
    }
}

impl Default for DocTree {
    fn default() -> Self {
        // 默认使用英文
        Self::new(&TargetLanguage::English)
    }
}

pub struct DiskOutlet {
    output_dir: PathBuf,
    doc_tree: DocTree,
}

impl DiskOutlet {
    pub fn new(output_dir: impl Into<PathBuf>, doc_tree: DocTree) -> Self {
        Self {
            output_dir: output_dir.into(),
            doc_tree,
        }
    }

    fn write_file(path: &Path, content: &str) -> Result<()> {
        if let Some(parent_dir) = path.parent() {
            if !parent_dir.exists() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        fs::write(path, content).context(format!("Failed to write {}", path.display()))?;
        println!("💾 已保存文档: {}", path.display());
        Ok(())
    }
}

/// 访谈记录的文件名，形如 `01-Dr-Ada.md`
fn transcript_filename(index: usize, analyst_name: &str) -> String {
    let slug: String = analyst_name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { "analyst".to_string() } else { slug };
    format!("{:02}-{}.md", index + 1, slug)
}

/// 渲染单场访谈的记录文件
fn render_transcript(interview: &InterviewState) -> String {
    let analyst = &interview.analyst;
    let mut doc = format!("# {}\n\n", analyst.name);
    doc.push_str(&format!("- Role: {}\n", analyst.role));
    doc.push_str(&format!("- Affiliation: {}\n", analyst.affiliation));
    doc.push_str(&format!("- Focus: {}\n\n", analyst.description));
    doc.push_str("## Transcript\n\n```text\n");
    doc.push_str(&interview.interview);
    doc.push_str("\n```\n");
    for section in &interview.sections {
        doc.push('\n');
        doc.push_str(section);
        doc.push('\n');
    }
    doc
}

impl Outlet for DiskOutlet {
    async fn save(&self, state: &ResearchState) -> Result<PathBuf> {
        println!("\n🖊️ 文档存储中...");
        let report = state
            .report
            .as_ref()
            .ok_or_else(|| anyhow!("报告尚未生成，无法保存"))?;

        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(&self.doc_tree.report);
        Self::write_file(&report_path, &report.render())?;

        let analysts_path = self.output_dir.join(&self.doc_tree.analysts);
        Self::write_file(&analysts_path, &serde_json::to_string_pretty(&state.analysts)?)?;

        let interviews_dir = self.output_dir.join(&self.doc_tree.interviews);
        for (index, interview) in state.interviews.iter().enumerate() {
            let path = interviews_dir.join(transcript_filename(index, &interview.analyst.name));
            Self::write_file(&path, &render_transcript(interview))?;
        }

        println!("💾 文档保存完成，输出目录: {}", self.output_dir.display());
        Ok(report_path)
    }
}
