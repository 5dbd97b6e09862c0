//! # Folio Core
//!
//! Domain types and pure logic shared by the Folio crates: the site content
//! documents and their edit operations, the scheduling model with the slot
//! availability calculator, and the traits for the external content store and
//! calendar backend.

pub mod availability;
pub mod calendar;
pub mod editor;
pub mod errors;
pub mod models;
pub mod store;
