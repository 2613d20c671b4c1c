pub mod api;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod map;
pub mod planner;
pub mod server;
pub mod services;
pub mod storage;
pub mod tokens;
