//! Query configuration and transport pipeline shared by the browser frontend
//! and the backend: column validation, workbook transcoding, descriptor
//! building and the engine boundary.

pub mod engine;
pub mod error;
pub mod model;
pub mod session;
