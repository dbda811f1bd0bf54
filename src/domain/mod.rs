//! Domain aggregates exposed by the contacts service layer.

pub mod contact;
pub mod token;
pub mod types;
pub mod user;
