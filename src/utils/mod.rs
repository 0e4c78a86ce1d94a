//! Utilidades compartidas

pub mod errors;
pub mod validation;
