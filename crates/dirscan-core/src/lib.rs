//! Core types for dirscan.
//!
//! This crate provides the data structures shared by the traversal engine
//! and its front ends: node records, scan configuration, the error
//! taxonomy and running statistics.

mod config;
mod error;
mod node;
mod stats;

pub use config::{DeviceBaseline, ScanConfig, ScanConfigBuilder};
pub use error::{ErrorCode, InspectError, ScanIssue};
pub use node::{InodeInfo, NameLookup, NodeKind, NodeRecord, Ownership, Timestamps};
pub use stats::ScanStats;
