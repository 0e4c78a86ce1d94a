//! Cálculo de nómina mensual de conductores
//!
//! Bruto = salario base + bata por días de viaje del mes; el neto
//! descuenta deducciones y anticipos pagados pendientes de descontar,
//! con clamp a cero en cada paso.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::utils::errors::{bad_request_error, AppError};

/// Anticipo pagado con saldo pendiente de descontar
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutstandingAdvance {
    pub id: Uuid,
    /// Saldo restante del anticipo (importe menos lo ya descontado)
    pub amount: Decimal,
}

/// Parte de un anticipo consumida por una nómina
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedAdvance {
    pub advance_id: Uuid,
    pub amount: Decimal,
    /// true si el anticipo quedó saldado con esta nómina
    pub exhausted: bool,
}

/// Entrada del cálculo de nómina
#[derive(Debug, Clone)]
pub struct SalaryInput {
    pub base_salary: Decimal,
    pub bata_per_day: Decimal,
    pub trip_days: i64,
    pub deductions: Decimal,
    /// Anticipos en orden de antigüedad (el más antiguo primero)
    pub outstanding_advances: Vec<OutstandingAdvance>,
}

/// Desglose de la nómina calculada
#[derive(Debug, Serialize)]
pub struct SalaryBreakdown {
    pub base_salary: Decimal,
    pub bata_amount: Decimal,
    pub deductions: Decimal,
    pub advance_deducted: Decimal,
    pub net_salary: Decimal,
    /// Consumo por anticipo, en el orden en que se descontaron
    #[serde(skip)]
    pub consumed_advances: Vec<ConsumedAdvance>,
}

/// Calcular la nómina de un mes
///
/// El descuento total de anticipos es min(saldo pendiente, pagable):
/// se consumen en orden de antigüedad y el último puede quedar
/// descontado parcialmente, con el resto para la nómina siguiente.
pub fn calculate_salary(input: &SalaryInput) -> Result<SalaryBreakdown, AppError> {
    if input.base_salary < Decimal::ZERO
        || input.bata_per_day < Decimal::ZERO
        || input.deductions < Decimal::ZERO
    {
        return Err(bad_request_error("salary components cannot be negative"));
    }
    if input.trip_days < 0 {
        return Err(bad_request_error("trip_days cannot be negative"));
    }

    let bata_amount = (input.bata_per_day * Decimal::from(input.trip_days)).round_dp(2);
    let gross = input.base_salary + bata_amount;
    let payable = (gross - input.deductions).max(Decimal::ZERO);

    let mut advance_deducted = Decimal::ZERO;
    let mut consumed_advances = Vec::new();
    for advance in &input.outstanding_advances {
        let remaining = payable - advance_deducted;
        if remaining <= Decimal::ZERO {
            break;
        }
        let take = advance.amount.min(remaining);
        advance_deducted += take;
        consumed_advances.push(ConsumedAdvance {
            advance_id: advance.id,
            amount: take,
            exhausted: take == advance.amount,
        });
    }

    let net_salary = (payable - advance_deducted).round_dp(2);

    Ok(SalaryBreakdown {
        base_salary: input.base_salary,
        bata_amount,
        deductions: input.deductions,
        advance_deducted,
        net_salary,
        consumed_advances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn advance(amount: &str) -> OutstandingAdvance {
        OutstandingAdvance {
            id: Uuid::new_v4(),
            amount: dec(amount),
        }
    }

    #[test]
    fn test_salary_without_advances() {
        let s = calculate_salary(&SalaryInput {
            base_salary: dec("18000"),
            bata_per_day: dec("500"),
            trip_days: 12,
            deductions: dec("1000"),
            outstanding_advances: vec![],
        })
        .unwrap();

        assert_eq!(s.bata_amount, dec("6000.00"));
        assert_eq!(s.advance_deducted, Decimal::ZERO);
        assert_eq!(s.net_salary, dec("23000.00"));
    }

    #[test]
    fn test_salary_deducts_advances_oldest_first() {
        let a1 = advance("5000");
        let a2 = advance("3000");
        let s = calculate_salary(&SalaryInput {
            base_salary: dec("20000"),
            bata_per_day: Decimal::ZERO,
            trip_days: 0,
            deductions: Decimal::ZERO,
            outstanding_advances: vec![a1.clone(), a2.clone()],
        })
        .unwrap();

        assert_eq!(s.advance_deducted, dec("8000"));
        assert_eq!(s.net_salary, dec("12000.00"));
        assert_eq!(
            s.consumed_advances,
            vec![
                ConsumedAdvance { advance_id: a1.id, amount: dec("5000"), exhausted: true },
                ConsumedAdvance { advance_id: a2.id, amount: dec("3000"), exhausted: true },
            ]
        );
    }

    #[test]
    fn test_salary_advance_deduction_clamped_to_payable() {
        let big = advance("20000");
        let s = calculate_salary(&SalaryInput {
            base_salary: dec("15000"),
            bata_per_day: Decimal::ZERO,
            trip_days: 0,
            deductions: Decimal::ZERO,
            outstanding_advances: vec![big.clone()],
        })
        .unwrap();

        // Se descuenta min(saldo, pagable); los 5000 restantes quedan
        // para la nómina siguiente
        assert_eq!(s.advance_deducted, dec("15000"));
        assert_eq!(s.net_salary, dec("0.00"));
        assert_eq!(
            s.consumed_advances,
            vec![ConsumedAdvance { advance_id: big.id, amount: dec("15000"), exhausted: false }]
        );
    }

    #[test]
    fn test_salary_partial_consumption_stops_at_payable() {
        let a1 = advance("4000");
        let a2 = advance("9000");
        let a3 = advance("1000");
        let s = calculate_salary(&SalaryInput {
            base_salary: dec("10000"),
            bata_per_day: Decimal::ZERO,
            trip_days: 0,
            deductions: Decimal::ZERO,
            outstanding_advances: vec![a1.clone(), a2.clone(), a3],
        })
        .unwrap();

        // 4000 entero + 6000 parciales del segundo; el tercero no se toca
        assert_eq!(s.advance_deducted, dec("10000"));
        assert_eq!(s.net_salary, dec("0.00"));
        assert_eq!(
            s.consumed_advances,
            vec![
                ConsumedAdvance { advance_id: a1.id, amount: dec("4000"), exhausted: true },
                ConsumedAdvance { advance_id: a2.id, amount: dec("6000"), exhausted: false },
            ]
        );
    }

    #[test]
    fn test_salary_net_never_negative() {
        let s = calculate_salary(&SalaryInput {
            base_salary: dec("10000"),
            bata_per_day: Decimal::ZERO,
            trip_days: 0,
            deductions: dec("25000"),
            outstanding_advances: vec![advance("1000")],
        })
        .unwrap();

        assert_eq!(s.net_salary, Decimal::ZERO.round_dp(2));
        assert_eq!(s.advance_deducted, Decimal::ZERO);
        assert!(s.consumed_advances.is_empty());
    }
}
