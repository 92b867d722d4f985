//! End-to-end editing scenarios through the `folio` facade
//!
//! Each module drives a `ContentService` over a `MemoryRepository` and
//! checks the stored history after every step.

mod common;

mod documented_behaviors;
mod lifecycle;
mod locking;
