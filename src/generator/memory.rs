/// 各阶段在Memory中的作用域
pub struct MemoryScope;

impl MemoryScope {
    pub const ANALYSTS: &'static str = "analysts";
    pub const INTERVIEWS: &'static str = "interviews";
    pub const REPORT: &'static str = "report";
}
