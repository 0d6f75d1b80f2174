use serde::{Deserialize, Serialize};

/// Token使用情况
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// 输入token数
    pub input_tokens: usize,
    /// 输出token数
    pub output_tokens: usize,
    /// 总token数
    pub total_tokens: usize,
}

impl TokenUsage {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }

    /// 按模型名称粗略估算成本（美元/百万token）
    pub fn estimate_cost(&self, model_name: &str) -> f64 {
        let model = model_name.to_lowercase();
        let (input_price, output_price) = if model.contains("mini") || model.contains("flash") {
            (0.15, 0.6)
        } else if model.contains("gpt-4o") || model.contains("sonnet") || model.contains("pro") {
            (2.5, 10.0)
        } else {
            (0.5, 1.5)
        };

        (self.input_tokens as f64 * input_price + self.output_tokens as f64 * output_price)
            / 1_000_000.0
    }
}
