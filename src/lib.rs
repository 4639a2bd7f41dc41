//! majorstep - framework major version upgrade library
//!
//! This library steps a project's framework dependencies towards a target
//! major version one version at a time:
//! - Reads the tracked versions from package.json
//! - Runs the framework updater for every lagging dependency, pass by pass
//! - Reconciles peer dependencies and commits after every step
//! - Installs companion packages once everything has converged

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logger;
pub mod manifest;
pub mod progress;
pub mod runner;
pub mod tools;
pub mod upgrade;
