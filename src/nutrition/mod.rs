pub mod daily_summary;
pub mod labels;
pub mod targets;
