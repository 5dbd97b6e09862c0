pub mod appointment;
pub mod contact;
pub mod content;
