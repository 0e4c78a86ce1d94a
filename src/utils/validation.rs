//! Utilidades de validación
//!
//! Validadores custom compartidos por los structs Request.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    // Matrícula india: "TN 09 AB 1234" con o sin separadores
    static ref REGISTRATION_RE: Regex =
        Regex::new(r"^[A-Z]{2}[\s-]?\d{1,2}[\s-]?[A-Z]{1,3}[\s-]?\d{1,4}$").unwrap();
}

/// Validar que un importe monetario sea no negativo
pub fn validate_amount(value: &rust_decimal::Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut error = ValidationError::new("non_negative_amount");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo
pub fn validate_registration_number(value: &str) -> Result<(), ValidationError> {
    if !REGISTRATION_RE.is_match(value.trim().to_uppercase().as_str()) {
        let mut error = ValidationError::new("registration_number");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"e.g. TN 09 AB 1234".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un mes esté en el rango 1-12
///
/// El derive de Validate pasa los campos escalares por valor.
pub fn validate_month(value: i32) -> Result<(), ValidationError> {
    if !(1..=12).contains(&value) {
        let mut error = ValidationError::new("month");
        error.add_param("value".into(), &value);
        error.add_param("range".into(), &"1 to 12".to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_number_formats() {
        assert!(validate_registration_number("TN 09 AB 1234").is_ok());
        assert!(validate_registration_number("KA-01-HH-9999").is_ok());
        assert!(validate_registration_number("tn09ab1234").is_ok());
        assert!(validate_registration_number("1234 AB").is_err());
        assert!(validate_registration_number("").is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_validate_amount() {
        use rust_decimal::Decimal;
        assert!(validate_amount(&Decimal::new(1500, 2)).is_ok());
        assert!(validate_amount(&Decimal::ZERO).is_ok());
        assert!(validate_amount(&Decimal::new(-1, 0)).is_err());
    }
}
