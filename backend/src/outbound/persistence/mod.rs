//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models`) and table definitions (`schema`) stay
//! private to this module. Connections come from a `bb8` pool through
//! `diesel-async`.

mod diesel_contact_repository;
mod diesel_experience_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_contact_repository::DieselContactRepository;
pub use diesel_experience_repository::DieselExperienceRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
