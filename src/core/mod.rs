//! # Core Module
//!
//! Concurrency primitives shared by the rest of the crate.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking,
//!   used as the per-chunk lock and for the pending block-update map
//!
//! ## Usage
//! ```rust
//! use voxel_stream::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod mt_resource;

pub use mt_resource::MtResource;
