pub mod background;
pub mod config;
pub mod info;
pub mod track;
pub mod trackers;
