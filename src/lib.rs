pub mod cli;
pub mod config;
pub mod data;
pub mod parallel;
pub mod projection;
pub mod report;
pub mod sim;
