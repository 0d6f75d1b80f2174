use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::i18n::TargetLanguage;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "deep-researcher.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 调研主题
    pub topic: Option<String>,

    /// 分析师数量上限
    pub max_analysts: usize,

    /// 每场访谈中专家回答的最大轮数
    pub max_num_turns: usize,

    /// 人工反馈触发重新生成分析师的最大次数
    pub max_feedback_rounds: usize,

    /// 预置的人工反馈，按顺序在检查点消费
    pub human_feedback: Vec<String>,

    /// 是否在终端中交互式地征求人工反馈
    pub interactive: bool,

    /// 没有可用反馈时是否在检查点中断并保存状态
    pub interrupt_before_feedback: bool,

    /// 从指定的检查点线程恢复
    pub resume_thread: Option<String>,

    /// 输出路径
    pub output_path: PathBuf,

    /// 内部工作目录路径 (检查点等)
    pub internal_path: PathBuf,

    /// 目标语言
    pub target_language: TargetLanguage,

    /// 启动时是否跳过模型连接检查
    pub skip_connection_check: bool,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 检索配置
    pub search: SearchConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，用于提问、检索词生成等常规任务
    pub model_efficient: String,

    /// 高质量模型，用于长上下文的写作任务，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,

    /// 并发访谈数上限
    pub max_parallels: usize,
}

/// 检索配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Tavily API KEY
    pub tavily_api_key: String,

    /// Tavily API地址
    pub tavily_api_url: String,

    /// 网页检索返回的最大结果数
    pub web_max_results: u32,

    /// Wikipedia语言版本，例如 en、zh
    pub wikipedia_language: String,

    /// Wikipedia最多加载的文档数
    pub wikipedia_max_docs: u32,

    /// 单篇Wikipedia文档保留的最大字符数
    pub wikipedia_max_doc_chars: usize,

    /// 检索请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 缓存配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,

    /// 缓存过期时间（小时）
    pub expire_hours: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 检查配置项的取值范围
    pub fn validate(&self) -> Result<()> {
        if self.max_analysts == 0 {
            bail!("max_analysts must be at least 1");
        }
        if self.max_num_turns == 0 {
            bail!("max_num_turns must be at least 1");
        }
        if self.resume_thread.is_none() && self.research_topic().is_none() {
            bail!("a research topic is required unless resuming a checkpoint");
        }
        Ok(())
    }

    /// 获取去除首尾空白后的调研主题
    pub fn research_topic(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
    }

    /// 检查点存放目录
    pub fn checkpoint_dir(&self) -> PathBuf {
        self.internal_path.join("checkpoints")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topic: None,
            max_analysts: 3,
            max_num_turns: 2,
            max_feedback_rounds: 5,
            human_feedback: vec![],
            interactive: false,
            interrupt_before_feedback: false,
            resume_thread: None,
            output_path: PathBuf::from("./research.docs"),
            internal_path: PathBuf::from("./.deep-researcher"),
            target_language: TargetLanguage::default(),
            skip_connection_check: false,
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            cache: CacheConfig::default(),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("DEEP_RESEARCHER_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model_efficient: String::from("gpt-4o-mini"),
            model_powerful: String::from("gpt-4o"),
            max_tokens: 8192,
            temperature: 0.0,
            retry_attempts: 5,
            retry_delay_ms: 5000,
            timeout_seconds: 300,
            max_parallels: 3,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tavily_api_key: std::env::var("TAVILY_API_KEY").unwrap_or_default(),
            tavily_api_url: String::from("https://api.tavily.com/search"),
            web_max_results: 3,
            wikipedia_language: String::from("en"),
            wikipedia_max_docs: 2,
            wikipedia_max_doc_chars: 4000,
            timeout_seconds: 30,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".deep-researcher/cache"),
            expire_hours: 720,
        }
    }
}
