//! Cálculo de cuotas EMI para préstamos de vehículos
//!
//! EMI = P·r·(1+r)^n / ((1+r)^n − 1) con r mensual; para r = 0 la cuota
//! es P/n. El calendario se calcula bajo demanda y la última fila
//! absorbe el redondeo para cerrar el saldo en cero exacto.

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::errors::{bad_request_error, AppError};

/// Fila del calendario de cuotas
#[derive(Debug, Clone, Serialize)]
pub struct EmiScheduleRow {
    pub installment: i32,
    pub due_date: NaiveDate,
    pub emi_amount: Decimal,
    pub interest_component: Decimal,
    pub principal_component: Decimal,
    pub closing_balance: Decimal,
}

/// Calendario completo de un préstamo
#[derive(Debug, Serialize)]
pub struct EmiSchedule {
    pub emi_amount: Decimal,
    pub total_interest: Decimal,
    pub total_payable: Decimal,
    pub rows: Vec<EmiScheduleRow>,
}

/// Calcular el importe de la cuota mensual, redondeado a 2 decimales
pub fn calculate_emi(
    principal: Decimal,
    annual_interest_rate: Decimal,
    tenure_months: i32,
) -> Result<Decimal, AppError> {
    if tenure_months <= 0 {
        return Err(bad_request_error("tenure_months must be positive"));
    }
    if principal <= Decimal::ZERO {
        return Err(bad_request_error("principal_amount must be positive"));
    }
    if annual_interest_rate < Decimal::ZERO {
        return Err(bad_request_error("annual_interest_rate cannot be negative"));
    }

    if annual_interest_rate.is_zero() {
        return Ok((principal / Decimal::from(tenure_months)).round_dp(2));
    }

    // La potencia (1+r)^n se calcula en f64 y se vuelve a Decimal
    let p = principal
        .to_f64()
        .ok_or_else(|| bad_request_error("principal_amount out of range"))?;
    let r = annual_interest_rate
        .to_f64()
        .ok_or_else(|| bad_request_error("annual_interest_rate out of range"))?
        / 12.0
        / 100.0;
    let n = tenure_months;

    let factor = (1.0 + r).powi(n);
    let emi = p * r * factor / (factor - 1.0);

    Decimal::from_f64(emi)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| bad_request_error("EMI amount out of range"))
}

/// Generar el calendario completo de cuotas de un préstamo
pub fn build_schedule(
    principal: Decimal,
    annual_interest_rate: Decimal,
    tenure_months: i32,
    start_date: NaiveDate,
) -> Result<EmiSchedule, AppError> {
    let emi = calculate_emi(principal, annual_interest_rate, tenure_months)?;
    let monthly_rate = annual_interest_rate / Decimal::from(1200);

    let mut rows = Vec::with_capacity(tenure_months as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;

    for k in 1..=tenure_months {
        let due_date = start_date
            .checked_add_months(Months::new(k as u32))
            .unwrap_or(start_date);

        let interest = (balance * monthly_rate).round_dp(2);
        let (emi_amount, principal_component) = if k == tenure_months {
            // Última cuota: liquida el saldo restante exacto
            (balance + interest, balance)
        } else {
            (emi, (emi - interest).min(balance))
        };

        balance -= principal_component;
        total_interest += interest;

        rows.push(EmiScheduleRow {
            installment: k,
            due_date,
            emi_amount: emi_amount.round_dp(2),
            interest_component: interest,
            principal_component: principal_component.round_dp(2),
            closing_balance: balance.round_dp(2),
        });
    }

    Ok(EmiSchedule {
        emi_amount: emi,
        total_interest: total_interest.round_dp(2),
        total_payable: (principal + total_interest).round_dp(2),
        rows,
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

    #[test]
    fn test_emi_standard_loan() {
        // 5 lakh al 10% anual por 24 meses: EMI conocida ~23072.46
        let emi = calculate_emi(dec("500000"), dec("10"), 24).unwrap();
        assert!(emi > dec("23070") && emi < dec("23075"), "emi = {}", emi);
    }

    #[test]
    fn test_emi_zero_interest() {
        let emi = calculate_emi(dec("120000"), Decimal::ZERO, 12).unwrap();
        assert_eq!(emi, dec("10000.00"));
    }

    #[test]
    fn test_emi_rejects_bad_inputs() {
        assert!(calculate_emi(dec("100000"), dec("10"), 0).is_err());
        assert!(calculate_emi(Decimal::ZERO, dec("10"), 12).is_err());
        assert!(calculate_emi(dec("100000"), dec("-1"), 12).is_err());
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let schedule = build_schedule(dec("300000"), dec("9.5"), 36, date("2026-01-15")).unwrap();
        assert_eq!(schedule.rows.len(), 36);

        let last = schedule.rows.last().unwrap();
        assert_eq!(last.closing_balance, Decimal::ZERO.round_dp(2));

        // El principal amortizado suma exactamente el principal
        let amortized: Decimal = schedule.rows.iter().map(|r| r.principal_component).sum();
        assert_eq!(amortized.round_dp(2), dec("300000.00"));
    }

    #[test]
    fn test_schedule_due_dates_monthly() {
        let schedule = build_schedule(dec("60000"), dec("12"), 3, date("2026-01-31")).unwrap();
        assert_eq!(schedule.rows[0].due_date, date("2026-02-28"));
        assert_eq!(schedule.rows[1].due_date, date("2026-03-31"));
        assert_eq!(schedule.rows[2].due_date, date("2026-04-30"));
    }

    #[test]
    fn test_schedule_interest_decreases() {
        let schedule = build_schedule(dec("200000"), dec("11"), 12, date("2026-03-01")).unwrap();
        for pair in schedule.rows.windows(2) {
            assert!(pair[0].interest_component >= pair[1].interest_component);
        }
    }
}
