pub mod agent_executor;
pub mod analysts;
pub mod checkpoint;
pub mod context;
pub mod interview;
pub mod memory;
pub mod outlet;
pub mod report;
pub mod search;
pub mod step_forward_agent;
#[cfg(test)]
pub(crate) mod test_support;
pub mod workflow;
