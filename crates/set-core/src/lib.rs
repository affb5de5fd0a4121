pub mod config;
pub mod game;
pub mod model;
pub mod oracle;
pub mod sync;
pub mod view;
