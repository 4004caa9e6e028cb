pub mod api_connection;
pub mod cli;
pub mod config;
pub mod logging;
pub mod meal_analyzer;
pub mod nutrition;
pub mod response_parser;
