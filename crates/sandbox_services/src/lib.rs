//! Sandbox Services Layer
//!
//! Host-side plumbing around the core: settings files, scene descriptions
//! and scripted input for headless runs.

pub mod input;
pub mod scene;
pub mod settings;
