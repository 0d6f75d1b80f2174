use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::llm::client::types::TokenUsage;

/// 缓存性能监控器
#[derive(Clone, Default)]
pub struct CachePerformanceMonitor {
    metrics: Arc<CacheMetrics>,
}

/// 缓存指标
#[derive(Default)]
struct CacheMetrics {
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
    cache_writes: AtomicUsize,
    cache_errors: AtomicUsize,
    input_tokens_saved: AtomicUsize,
    output_tokens_saved: AtomicUsize,
    /// 分类统计 (hits, misses)
    category_metrics: RwLock<HashMap<String, (usize, usize)>>,
}

/// 缓存性能报告
#[derive(Debug, Serialize, Deserialize)]
pub struct CachePerformanceReport {
    /// 缓存命中率
    pub hit_rate: f64,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cache_writes: usize,
    pub cache_errors: usize,
    /// 节省的输入token数量
    pub input_tokens_saved: usize,
    /// 节省的输出token数量
    pub output_tokens_saved: usize,
    /// 分类统计 (hits, misses)
    pub category_stats: HashMap<String, (usize, usize)>,
}

impl CachePerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录缓存命中
    pub fn record_cache_hit(&self, category: &str, token_usage: Option<&TokenUsage>) {
        self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
        if let Some(usage) = token_usage {
            self.metrics
                .input_tokens_saved
                .fetch_add(usage.input_tokens, Ordering::Relaxed);
            self.metrics
                .output_tokens_saved
                .fetch_add(usage.output_tokens, Ordering::Relaxed);
        }
        self.bump_category(category, true);
        tracing::debug!("   💰 缓存命中 [{}]", category);
    }

    /// 记录缓存未命中
    pub fn record_cache_miss(&self, category: &str) {
        self.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);
        self.bump_category(category, false);
        tracing::debug!("   ⌛ 缓存未命中 [{}] - 需要进行AI推理", category);
    }

    /// 记录缓存写入
    pub fn record_cache_write(&self, category: &str) {
        self.metrics.cache_writes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("   💾 缓存写入 [{}]", category);
    }

    /// 记录缓存错误
    pub fn record_cache_error(&self, category: &str, error: &str) {
        self.metrics.cache_errors.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("   ❌ 缓存错误 [{}]: {}", category, error);
    }

    fn bump_category(&self, category: &str, hit: bool) {
        if let Ok(mut category_map) = self.metrics.category_metrics.write() {
            let entry = category_map.entry(category.to_string()).or_default();
            if hit {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }

    /// 生成性能报告
    pub fn generate_report(&self) -> CachePerformanceReport {
        let hits = self.metrics.cache_hits.load(Ordering::Relaxed);
        let misses = self.metrics.cache_misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CachePerformanceReport {
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
            cache_hits: hits,
            cache_misses: misses,
            cache_writes: self.metrics.cache_writes.load(Ordering::Relaxed),
            cache_errors: self.metrics.cache_errors.load(Ordering::Relaxed),
            input_tokens_saved: self.metrics.input_tokens_saved.load(Ordering::Relaxed),
            output_tokens_saved: self.metrics.output_tokens_saved.load(Ordering::Relaxed),
            category_stats: self
                .metrics
                .category_metrics
                .read()
                .map(|map| map.clone())
                .unwrap_or_default(),
        }
    }
}
