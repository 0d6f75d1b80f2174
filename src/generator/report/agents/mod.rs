pub mod framing_writer;
pub mod report_writer;
