//! Export orchestration
//!
//! This module provides the bulk export logic, including:
//! - The orchestrator driving local and Notion runs
//! - Typed run requests
//! - Summary and reporting

pub mod orchestrator;
pub mod request;
pub mod summary;

pub use orchestrator::{BatchOrchestrator, LocalExport, OrchestratorOptions, RunResult};
pub use request::ExportRequest;
pub use summary::ExportSummary;
