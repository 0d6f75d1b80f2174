use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Memory元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub data_sizes: HashMap<String, usize>,
    pub total_size: usize,
}

impl Default for MemoryMetadata {
    fn default() -> Self {
        Self {
            created_at: Utc::now(),
            last_updated: Utc::now(),
            data_sizes: HashMap::new(),
            total_size: 0,
        }
    }
}

/// 运行期内存：按 `scope:key` 保存各Agent的最新输出
#[derive(Debug, Default)]
pub struct Memory {
    data: HashMap<String, Value>,
    metadata: MemoryMetadata,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    fn full_key(scope: &str, key: &str) -> String {
        format!("{}:{}", scope, key)
    }

    /// 存储数据到指定作用域和键
    pub fn store<T>(&mut self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize,
    {
        let full_key = Self::full_key(scope, key);
        let serialized = serde_json::to_value(data)?;
        let data_size = serialized.to_string().len();

        if let Some(old_size) = self.metadata.data_sizes.insert(full_key.clone(), data_size) {
            self.metadata.total_size -= old_size;
        }
        self.metadata.total_size += data_size;
        self.metadata.last_updated = Utc::now();

        self.data.insert(full_key, serialized);
        Ok(())
    }

    /// 列出指定作用域的所有键
    pub fn list_keys(&self, scope: &str) -> Vec<String> {
        let prefix = format!("{}:", scope);
        let mut keys: Vec<String> = self
            .data
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect();
        keys.sort();
        keys
    }

    /// 获取各作用域的内存使用统计
    pub fn get_usage_stats(&self) -> HashMap<String, usize> {
        let mut stats = HashMap::new();
        for (key, size) in &self.metadata.data_sizes {
            let scope = key.split(':').next().unwrap_or("unknown").to_string();
            *stats.entry(scope).or_insert(0) += size;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_serializes_value() {
        let mut memory = Memory::new();
        memory.store("interview", "Ada", vec!["q1", "a1"]).unwrap();

        assert_eq!(
            memory.data.get("interview:Ada"),
            Some(&serde_json::json!(["q1", "a1"]))
        );
        assert!(memory.list_keys("report").is_empty());
    }

    #[test]
    fn test_overwrite_keeps_size_accounting() {
        let mut memory = Memory::new();
        memory.store("report", "draft", "short").unwrap();
        memory.store("report", "draft", "a much longer draft").unwrap();

        assert_eq!(memory.metadata.total_size, "\"a much longer draft\"".len());
        assert_eq!(
            memory.get_usage_stats().get("report"),
            Some(&memory.metadata.total_size)
        );
    }

    #[test]
    fn test_list_keys_by_scope() {
        let mut memory = Memory::new();
        memory.store("interview", "b", 1).unwrap();
        memory.store("interview", "a", 2).unwrap();
        memory.store("report", "c", 3).unwrap();

        assert_eq!(memory.list_keys("interview"), vec!["a", "b"]);
        assert_eq!(memory.list_keys("report"), vec!["c"]);
    }
}
