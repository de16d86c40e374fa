//! Step definitions for project and task planning scenarios.

pub mod world;
