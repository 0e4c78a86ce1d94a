//! Servicios de cálculo y consulta
//!
//! Aritmética de facturación/nómina/EMI, números de serie y consulta
//! de precio de combustible.

pub mod billing;
pub mod fuel_price;
pub mod loan;
pub mod number_words;
pub mod salary;
pub mod serial;
