//! K-Drama Report library: CSV loading, view aggregation, chart rendering
//! and report export. The binary wraps it in an eframe window.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod gui;
pub mod report;
