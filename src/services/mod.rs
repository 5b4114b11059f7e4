pub mod config;
pub mod mapper;
pub mod report;
