mod config;
pub use self::config::{Config, Host};

pub mod actions;
pub mod location;

mod commands;

mod start;
pub use self::start::start;
