//! Test utilities and mock types for FROST allocator development.
//!
//! Provides a mock [`RawSpace`](frost_alloc_core::RawSpace) supplier
//! ([`MockSpace`]), span checkers for overlap and alignment assertions,
//! and a one-shot tracing subscriber for tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{assert_aligned, assert_disjoint, init_tracing, MockSpace};
