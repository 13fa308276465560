//! Catalog domain model: topics, courses and textbooks.
//!
//! # Responsibility
//! - Define the in-memory shape of every persisted catalog record.
//! - Encode relationship ownership explicitly (who carries the join rows or
//!   foreign key).
//!
//! # Invariants
//! - Identifiers are assigned by the store on first save and are strictly
//!   positive; `None` means "not persisted yet".
//! - Equality is identity-based, see [`identity`].
//!
//! # See also
//! - migrations/0001_init.sql

pub mod course;
pub mod identity;
pub mod textbook;
pub mod topic;
