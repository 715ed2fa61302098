//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `sous-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `ManifestParser`: Manifest text → domain objects
//!   - `SourceFetcher`: Remote recipe source checkout
//!   - `ProcessRunner`: Hook/command subprocess execution
//!   - `StateStore`: Workspace config/lock persistence
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    CommandOutcome, Filesystem, ManifestParser, ProcessRunner, SourceFetcher, StateStore,
};
