pub mod browser;
pub mod config;
pub mod design;
pub mod listing;
pub mod outputs;
pub mod styles;
