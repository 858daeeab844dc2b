pub mod action;
pub mod config;
pub mod dashboard;
pub mod event;
pub mod format;
pub mod logging;
pub mod ranking;
pub mod scheduler;
pub mod shutdown;
pub mod stream;
pub mod system;
pub mod throttle;
pub mod ui;
