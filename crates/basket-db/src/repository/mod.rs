//! # Repository Layer
//!
//! Database operations grouped by entity. The cart holds a single flat
//! collection, so there is exactly one repository.

pub mod cart;
