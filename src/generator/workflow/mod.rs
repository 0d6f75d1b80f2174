use crate::config::Config;
use crate::generator::analysts::{
    self,
    feedback::{AnalystRoute, FeedbackProvider, provider_for, should_continue},
};
use crate::generator::checkpoint::{CheckpointError, Checkpointer, ResearchStage, ResearchState};
use crate::generator::context::GeneratorContext;
use crate::generator::interview;
use crate::generator::memory::MemoryScope;
use crate::generator::outlet::{DiskOutlet, DocTree, Outlet};
use crate::generator::report;
use crate::llm::client::types::TokenUsage;

use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: std::time::Instant,
    phase_start_times: HashMap<String, std::time::Instant>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), std::time::Instant::now());
    }

    /// 结束一个阶段的计时，同名阶段多次执行时累计
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let duration = self.phase_start_times.remove(phase_name)?.elapsed();
        match self
            .phase_durations
            .iter_mut()
            .find(|(name, _)| name == phase_name)
        {
            Some((_, total)) => *total += duration,
            None => self
                .phase_durations
                .push((phase_name.to_string(), duration)),
        }
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 按阶段首次执行的顺序返回累计耗时
    pub fn get_phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const ANALYSTS: &'static str = "analysts";
    pub const INTERVIEWS: &'static str = "interviews";
    pub const REPORT: &'static str = "report";
    pub const OUTPUT: &'static str = "output";
}

/// 工作流的结束方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// 报告已写出
    Completed(PathBuf),
    /// 在人工审核前中断，可通过线程ID恢复
    Interrupted(String),
}

/// 启动调研工作流
pub async fn launch(config: &Config) -> Result<WorkflowOutcome> {
    config.validate()?;
    let context = GeneratorContext::new(config.clone())?;

    // 启动时检查模型连接
    if !config.skip_connection_check {
        context.llm_client.check_connection().await?;
    }

    let feedback = provider_for(config);
    run(&context, feedback.as_ref()).await
}

/// 加载或新建调研状态
async fn prepare_state(config: &Config, checkpointer: &Checkpointer) -> Result<ResearchState> {
    if let Some(thread_id) = &config.resume_thread {
        let state = match checkpointer.load(thread_id).await {
            Ok(state) => state,
            Err(CheckpointError::NotFound(id)) => {
                let available = checkpointer.list().await.unwrap_or_default();
                return Err(anyhow!(
                    "找不到调研线程 {}，可恢复的线程: [{}]",
                    id,
                    available.join(", ")
                ));
            }
            Err(e) => return Err(e).context(format!("Failed to load checkpoint {}", thread_id)),
        };

        if let Some(topic) = config.research_topic() {
            if topic != state.topic {
                tracing::warn!(
                    "恢复的线程主题为「{}」，忽略命令行给出的主题「{}」",
                    state.topic,
                    topic
                );
            }
        }
        println!("🔁 恢复调研线程 {}（阶段: {:?}）", state.thread_id, state.stage);
        return Ok(state);
    }

    let topic = config
        .research_topic()
        .ok_or_else(|| anyhow!("缺少调研主题"))?;
    Ok(ResearchState::new(topic, config.max_analysts))
}

/// 人工审核一轮后的处理
enum Review {
    Revise(String),
    Approve,
    Interrupt,
}

async fn review_analysts(
    config: &Config,
    state: &ResearchState,
    feedback: &dyn FeedbackProvider,
) -> Result<Review> {
    let reply = feedback
        .request_feedback(&state.topic, &state.analysts)
        .await?;

    let Some(text) = reply else {
        return Ok(if config.interrupt_before_feedback {
            Review::Interrupt
        } else {
            Review::Approve
        });
    };

    match should_continue(Some(text.as_str())) {
        AnalystRoute::End => Ok(Review::Approve),
        AnalystRoute::CreateAnalysts if state.feedback_rounds >= config.max_feedback_rounds => {
            tracing::warn!(
                "反馈轮数已达上限{}，采用当前分析师团队",
                config.max_feedback_rounds
            );
            Ok(Review::Approve)
        }
        AnalystRoute::CreateAnalysts => Ok(Review::Revise(text.trim().to_string())),
    }
}

/// 按阶段推进工作流，每个阶段完成后保存检查点
pub async fn run(context: &GeneratorContext, feedback: &dyn FeedbackProvider) -> Result<WorkflowOutcome> {
    let config = &context.config;
    let checkpointer = Checkpointer::new(config.checkpoint_dir());
    let mut state = prepare_state(config, &checkpointer).await?;
    let mut timing = TimingScope::new();

    println!("🚀 调研主题: {}（线程 {}）", state.topic, state.thread_id);

    loop {
        match state.stage {
            ResearchStage::Pending => {
                timing.start_phase(TimingKeys::ANALYSTS);
                let feedback_text = state.pending_feedback.take();
                state.analysts = analysts::create_analysts(
                    context,
                    &state.topic,
                    state.max_analysts,
                    feedback_text.as_deref(),
                )
                .await?;
                state.stage = ResearchStage::AwaitingFeedback;
                checkpointer.save(&mut state).await?;
                timing.end_phase(TimingKeys::ANALYSTS);
            }
            ResearchStage::AwaitingFeedback => {
                match review_analysts(config, &state, feedback).await? {
                    Review::Revise(text) => {
                        println!("✏️ 根据反馈重新组建团队: {}", text);
                        state.record_feedback(&text);
                        state.stage = ResearchStage::Pending;
                    }
                    Review::Approve => {
                        println!("✓ 分析师团队已确认");
                        state.stage = ResearchStage::AnalystsApproved;
                    }
                    Review::Interrupt => {
                        checkpointer.save(&mut state).await?;
                        println!(
                            "⏸️ 等待人工反馈，已保存检查点。使用 `--resume {} --feedback <意见>` 继续",
                            state.thread_id
                        );
                        return Ok(WorkflowOutcome::Interrupted(state.thread_id));
                    }
                }
                checkpointer.save(&mut state).await?;
            }
            ResearchStage::AnalystsApproved => {
                timing.start_phase(TimingKeys::INTERVIEWS);
                let interviews =
                    interview::conduct_interviews(context, &state.topic, &state.analysts).await?;
                state.sections = interviews
                    .iter()
                    .flat_map(|i| i.sections.iter().cloned())
                    .collect();
                state.interviews = interviews;
                state.stage = ResearchStage::InterviewsConducted;
                checkpointer.save(&mut state).await?;
                timing.end_phase(TimingKeys::INTERVIEWS);
            }
            ResearchStage::InterviewsConducted => {
                timing.start_phase(TimingKeys::REPORT);
                let report = report::compose_report(context, &state.topic, &state.sections).await?;
                state.report = Some(report);
                state.stage = ResearchStage::ReportWritten;
                checkpointer.save(&mut state).await?;
                timing.end_phase(TimingKeys::REPORT);
            }
            ResearchStage::ReportWritten => {
                timing.start_phase(TimingKeys::OUTPUT);
                let outlet = DiskOutlet::new(
                    config.output_path.clone(),
                    DocTree::new(&config.target_language),
                );
                let report_path = outlet.save(&state).await?;
                timing.end_phase(TimingKeys::OUTPUT);

                if config.verbose {
                    print_summary(context, &timing).await;
                }
                return Ok(WorkflowOutcome::Completed(report_path));
            }
        }
    }
}

async fn print_summary(context: &GeneratorContext, timing: &TimingScope) {
    println!("\n⏱️ {}", timing.generate_timing_report());

    let cache_report = context.cache_manager.read().await.generate_performance_report();
    println!(
        "📦 缓存命中率: {:.1}% (命中 {}, 未命中 {}, 写入 {}, 错误 {})",
        cache_report.hit_rate * 100.0,
        cache_report.cache_hits,
        cache_report.cache_misses,
        cache_report.cache_writes,
        cache_report.cache_errors
    );

    let saved = TokenUsage::new(cache_report.input_tokens_saved, cache_report.output_tokens_saved);
    println!(
        "💰 缓存节省约 {} tokens (估算 ${:.4})",
        saved.total_tokens,
        saved.estimate_cost(&context.config.llm.model_efficient)
    );

    let memory_stats = context.get_memory_stats().await;
    for scope in [MemoryScope::ANALYSTS, MemoryScope::INTERVIEWS, MemoryScope::REPORT] {
        println!(
            "🧠 Memory[{}]: {}条记录, {} bytes",
            scope,
            context.list_memory_keys(scope).await.len(),
            memory_stats.get(scope).copied().unwrap_or(0)
        );
    }
}

// Include tests
#[cfg(test)]
mod tests;
