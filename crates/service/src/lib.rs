//! Service layer providing the record CRUD contract on top of models.
//! - Record stores: in-memory and document-backed, behind one trait.
//! - Seed loading at startup.
//! - A generic handler parameterized by an entity profile.

pub mod errors;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod seed;
pub mod records;
