pub mod catalog;
pub mod config;
pub mod custom;
pub mod durations;
pub mod stats;
pub mod timer;
