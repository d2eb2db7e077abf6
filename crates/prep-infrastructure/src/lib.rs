pub mod async_dir_session_repository;
pub mod config_service;
pub mod dto;
pub mod paths;
pub mod storage;

pub use crate::async_dir_session_repository::AsyncDirSessionRepository;
pub use crate::config_service::ConfigService;
pub use crate::paths::PrepPaths;
