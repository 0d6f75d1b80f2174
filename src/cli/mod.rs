use crate::config::{Config, DEFAULT_CONFIG_FILE, LLMProvider};
use crate::i18n::TargetLanguage;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Deep Researcher - 由Rust与AI驱动的多分析师自动调研引擎
#[derive(Parser, Debug)]
#[command(name = "deep-researcher")]
#[command(
    about = "AI-based research engine. It builds a team of analyst personas, interviews an LLM expert grounded in web and Wikipedia search for each of them, and writes a structured report."
)]
#[command(author = "Sopaco")]
#[command(version)]
pub struct Args {
    /// 调研主题
    #[arg(short, long)]
    pub topic: Option<String>,

    /// 分析师数量上限
    #[arg(short = 'a', long)]
    pub max_analysts: Option<usize>,

    /// 每场访谈专家回答的最大轮数
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// 输出路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 预置的人工反馈，可多次指定，按顺序在检查点使用
    #[arg(short, long)]
    pub feedback: Vec<String>,

    /// 在终端中交互式审核分析师团队
    #[arg(short, long)]
    pub interactive: bool,

    /// 没有可用反馈时，在人工检查点中断并保存进度
    #[arg(long)]
    pub interrupt: bool,

    /// 从指定的检查点线程恢复
    #[arg(long)]
    pub resume: Option<String>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 高能效模型
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，同时作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM Provider (openai, deepseek, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 并发访谈数上限
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// Tavily API KEY
    #[arg(long)]
    pub tavily_api_key: Option<String>,

    /// 目标语言 (zh, en, ja, de, fr)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 是否禁用缓存
    #[arg(long)]
    pub no_cache: bool,

    /// 跳过启动时的模型连接检查
    #[arg(long)]
    pub skip_connection_check: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定的配置文件必须可读
            Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?
        } else {
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_CONFIG_FILE);

            if default_config_path.exists() {
                Config::from_file(&default_config_path).with_context(|| {
                    format!("无法读取默认配置文件 {:?}", default_config_path)
                })?
            } else {
                Config::default()
            }
        };

        self.apply_to(&mut config);
        Ok(config)
    }

    /// 用命令行参数覆盖配置中的对应项
    fn apply_to(self, config: &mut Config) {
        if let Some(topic) = self.topic {
            config.topic = Some(topic);
        }
        if let Some(max_analysts) = self.max_analysts {
            config.max_analysts = max_analysts;
        }
        if let Some(max_turns) = self.max_turns {
            config.max_num_turns = max_turns;
        }
        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }
        if !self.feedback.is_empty() {
            config.human_feedback = self.feedback;
        }
        if self.interactive {
            config.interactive = true;
        }
        if self.interrupt {
            config.interrupt_before_feedback = true;
        }
        if self.resume.is_some() {
            config.resume_thread = self.resume;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(_) => tracing::warn!(
                    "未知的provider: {}，继续使用 {}",
                    provider_str,
                    config.llm.provider
                ),
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.llm.max_parallels = max_parallels;
        }

        if let Some(tavily_api_key) = self.tavily_api_key {
            config.search.tavily_api_key = tavily_api_key;
        }

        if let Some(target_language_str) = self.target_language {
            match target_language_str.parse::<TargetLanguage>() {
                Ok(target_language) => config.target_language = target_language,
                Err(_) => tracing::warn!(
                    "未知的目标语言: {}，继续使用 {}",
                    target_language_str,
                    config.target_language.display_name()
                ),
            }
        }

        if self.no_cache {
            config.cache.enabled = false;
        }
        if self.skip_connection_check {
            config.skip_connection_check = true;
        }
        if self.verbose {
            config.verbose = true;
        }
    }
}
