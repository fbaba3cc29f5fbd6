pub mod catalog;
pub mod compose;
pub mod config;
pub mod feed_demo;
pub mod studio;
