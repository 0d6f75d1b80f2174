pub mod expert_answerer;
pub mod question_asker;
pub mod search_query_writer;
pub mod section_writer;
