#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod credential;
pub mod error;
pub mod performance_service;
pub mod quiz_api;
pub mod sessions;
pub mod submitter;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use config::ApiConfig;
pub use credential::Credential;
pub use error::{ApiError, AppServicesError, ConfigError};
pub use performance_service::PerformanceService;
pub use quiz_api::{HttpQuizApi, QuizApi};
pub use sessions::{SessionOptions, TimedQuizSession};
pub use submitter::{ApiSubmitter, Submitter};
