pub mod config;
pub mod console;
pub mod keyboard;
pub mod logging;
pub mod runner;
