//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories used without a database
//! - **feed**: broadcast-based live experience updates
//! - **identity_toolkit**, **emailjs**, **unsplash**, **pixabay**, **gemini**:
//!   reqwest clients for the hosted services
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod emailjs;
pub mod feed;
pub mod gemini;
mod http_support;
pub mod identity_toolkit;
pub mod memory;
pub mod persistence;
pub mod pixabay;
pub mod unsplash;
