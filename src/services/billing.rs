//! Cálculo de facturación de hojas de viaje
//!
//! A partir de una hoja cerrada y las tarifas de su tipo de vehículo:
//! km facturados con mínimo diario, bata del conductor por día, cargos
//! de peaje y otros, e IVA sobre el subtotal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::services::number_words::amount_to_indian_words;
use crate::utils::errors::{bad_request_error, AppError};

/// Entrada del cálculo de facturación
#[derive(Debug, Clone)]
pub struct BillingInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_km: Decimal,
    pub rate_per_km: Decimal,
    pub minimum_km_per_day: Decimal,
    pub driver_bata_per_day: Decimal,
    pub toll_charges: Decimal,
    pub other_charges: Decimal,
    pub tax_percent: Decimal,
}

/// Desglose completo de la factura calculada
#[derive(Debug, Clone, Serialize)]
pub struct BillingBreakdown {
    pub days: i64,
    pub billed_km: Decimal,
    pub base_amount: Decimal,
    pub bata_amount: Decimal,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub amount_in_words: String,
}

/// Días naturales del viaje, inclusivos en ambos extremos (mínimo 1)
pub fn trip_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    ((end_date - start_date).num_days() + 1).max(1)
}

/// Calcular el desglose de facturación de una hoja de viaje cerrada
pub fn calculate_billing(input: &BillingInput) -> Result<BillingBreakdown, AppError> {
    if input.end_date < input.start_date {
        return Err(bad_request_error("end_date cannot be before start_date"));
    }
    if input.total_km < Decimal::ZERO {
        return Err(bad_request_error("total_km cannot be negative"));
    }
    if input.rate_per_km < Decimal::ZERO || input.tax_percent < Decimal::ZERO {
        return Err(bad_request_error("rates cannot be negative"));
    }

    let days = trip_days(input.start_date, input.end_date);
    let minimum_km = input.minimum_km_per_day * Decimal::from(days);

    // Se factura el máximo entre los km recorridos y el mínimo contratado
    let billed_km = input.total_km.max(minimum_km);

    let base_amount = (billed_km * input.rate_per_km).round_dp(2);
    let bata_amount = (input.driver_bata_per_day * Decimal::from(days)).round_dp(2);
    let subtotal =
        (base_amount + bata_amount + input.toll_charges + input.other_charges).round_dp(2);
    let tax_amount = (subtotal * input.tax_percent / Decimal::from(100)).round_dp(2);
    let total_amount = (subtotal + tax_amount).round_dp(2);

    Ok(BillingBreakdown {
        days,
        billed_km,
        base_amount,
        bata_amount,
        subtotal,
        tax_amount,
        total_amount,
        amount_in_words: amount_to_indian_words(total_amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn input() -> BillingInput {
        BillingInput {
            start_date: date("2026-04-10"),
            end_date: date("2026-04-12"),
            total_km: dec("850"),
            rate_per_km: dec("18"),
            minimum_km_per_day: dec("250"),
            driver_bata_per_day: dec("500"),
            toll_charges: dec("1200"),
            other_charges: dec("300"),
            tax_percent: dec("5"),
        }
    }

    #[test]
    fn test_billing_above_minimum_km() {
        // 3 días, mínimo 750 km < 850 recorridos: se facturan 850
        let b = calculate_billing(&input()).unwrap();
        assert_eq!(b.days, 3);
        assert_eq!(b.billed_km, dec("850"));
        assert_eq!(b.base_amount, dec("15300.00"));
        assert_eq!(b.bata_amount, dec("1500.00"));
        assert_eq!(b.subtotal, dec("18300.00"));
        assert_eq!(b.tax_amount, dec("915.00"));
        assert_eq!(b.total_amount, dec("19215.00"));
    }

    #[test]
    fn test_billing_minimum_km_clamp() {
        let mut i = input();
        i.total_km = dec("400");
        let b = calculate_billing(&i).unwrap();
        // 3 días × 250 km mínimos = 750 km facturados aunque se recorrieran 400
        assert_eq!(b.billed_km, dec("750"));
        assert_eq!(b.base_amount, dec("13500.00"));
    }

    #[test]
    fn test_billing_single_day_trip() {
        let mut i = input();
        i.end_date = i.start_date;
        i.total_km = dec("100");
        let b = calculate_billing(&i).unwrap();
        assert_eq!(b.days, 1);
        assert_eq!(b.billed_km, dec("250"));
        assert_eq!(b.bata_amount, dec("500.00"));
    }

    #[test]
    fn test_billing_amount_in_words() {
        let b = calculate_billing(&input()).unwrap();
        assert_eq!(
            b.amount_in_words,
            "Rupees Nineteen Thousand Two Hundred Fifteen Only"
        );
    }

    #[test]
    fn test_billing_rejects_inverted_dates() {
        let mut i = input();
        i.end_date = date("2026-04-01");
        assert!(calculate_billing(&i).is_err());
    }
}
