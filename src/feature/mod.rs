//! The features of the application, one module each.

pub mod info;
pub mod item;
