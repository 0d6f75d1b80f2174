use serde::{Deserialize, Serialize};

/// Token估算器，用于在没有provider计量数据时估算文本的token数量
pub struct TokenEstimator {
    rules: TokenCalculationRules,
}

/// Token计算规则
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCalculationRules {
    /// 拉丁字符的平均token比例（字符数/token数）
    pub latin_char_per_token: f64,
    /// CJK字符的平均token比例
    pub cjk_char_per_token: f64,
    /// 基础token开销（消息包装等）
    pub base_token_overhead: usize,
}

impl Default for TokenCalculationRules {
    fn default() -> Self {
        Self {
            latin_char_per_token: 4.0,
            cjk_char_per_token: 1.5,
            base_token_overhead: 50,
        }
    }
}

/// Token估算结果
#[derive(Debug, Clone)]
pub struct TokenEstimation {
    /// 估算的token数量
    pub estimated_tokens: usize,
    /// 文本字符数
    pub character_count: usize,
    /// CJK字符数
    pub cjk_char_count: usize,
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEstimator {
    pub fn new() -> Self {
        Self {
            rules: TokenCalculationRules::default(),
        }
    }

    /// 估算文本的token数量
    pub fn estimate_tokens(&self, text: &str) -> TokenEstimation {
        let character_count = text.chars().count();
        let cjk_char_count = text.chars().filter(|c| is_cjk_char(*c)).count();
        let latin_char_count = character_count - cjk_char_count;

        let cjk_tokens = (cjk_char_count as f64 / self.rules.cjk_char_per_token).ceil() as usize;
        let latin_tokens =
            (latin_char_count as f64 / self.rules.latin_char_per_token).ceil() as usize;

        TokenEstimation {
            estimated_tokens: cjk_tokens + latin_tokens + self.rules.base_token_overhead,
            character_count,
            cjk_char_count,
        }
    }
}

/// 判断是否为CJK表意文字或日文假名
fn is_cjk_char(c: char) -> bool {
    matches!(c as u32,
        0x3040..=0x30FF |   // 平假名、片假名
        0x3400..=0x4DBF |   // CJK扩展A
        0x4E00..=0x9FFF |   // CJK统一汉字
        0x20000..=0x2A6DF   // CJK扩展B
    )
}
