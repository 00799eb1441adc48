pub mod config;
pub mod reading;

pub use config::Config;
pub use reading::*;
