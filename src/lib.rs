pub mod analyzers;
pub mod charts;
pub mod config;
pub mod loader;
pub mod logging;
pub mod output;
pub mod records;
pub mod report;
