pub mod common;
pub mod completions;
pub mod config;
pub mod create;
pub mod delete;
pub mod duplicate;
pub mod edit;
pub mod export;
pub mod favorite;
pub mod import;
pub mod list;
pub mod recent;
pub mod render;
pub mod seed;
pub mod settings;
pub mod show;
pub mod tokens;
