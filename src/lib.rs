pub mod cli;
pub mod config;
pub mod error;
pub mod gpx;
pub mod map;
pub mod storage;
pub mod tracker;
pub mod types;
pub mod utils;
pub mod view;
