//! Conversión de importes a palabras en sistema de numeración indio
//!
//! Agrupación crore/lakh/thousand/hundred, con paise a partir de la
//! fracción redondeada a dos decimales.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const UNITS: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Convertir un número de 0 a 99 a palabras
fn two_digits(n: u64) -> String {
    if n < 20 {
        UNITS[n as usize].to_string()
    } else if n % 10 == 0 {
        TENS[(n / 10) as usize].to_string()
    } else {
        format!("{} {}", TENS[(n / 10) as usize], UNITS[(n % 10) as usize])
    }
}

/// Convertir un entero no negativo a palabras con agrupación india:
/// crore (10^7), lakh (10^5), thousand (10^3), hundred (10^2).
fn integer_to_words(mut n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }

    let mut parts: Vec<String> = Vec::new();

    let crore = n / 10_000_000;
    n %= 10_000_000;
    if crore > 0 {
        // Los crores se expresan recursivamente: "One Hundred Crore"
        parts.push(format!("{} Crore", integer_to_words(crore)));
    }

    let lakh = n / 100_000;
    n %= 100_000;
    if lakh > 0 {
        parts.push(format!("{} Lakh", two_digits(lakh)));
    }

    let thousand = n / 1_000;
    n %= 1_000;
    if thousand > 0 {
        parts.push(format!("{} Thousand", two_digits(thousand)));
    }

    let hundred = n / 100;
    n %= 100;
    if hundred > 0 {
        parts.push(format!("{} Hundred", UNITS[hundred as usize]));
    }

    if n > 0 {
        parts.push(two_digits(n));
    }

    parts.join(" ")
}

/// Convertir un importe en rupias a palabras.
///
/// El importe se redondea a dos decimales; los importes negativos se
/// tratan como su valor absoluto (no hay facturas negativas).
pub fn amount_to_indian_words(amount: Decimal) -> String {
    let rounded = amount.abs().round_dp(2);
    let rupees = rounded.trunc().to_u64().unwrap_or(0);
    let paise = ((rounded - rounded.trunc()) * Decimal::from(100))
        .round()
        .to_u64()
        .unwrap_or(0);

    match (rupees, paise) {
        (0, 0) => "Zero Rupees Only".to_string(),
        (r, 0) => format!("Rupees {} Only", integer_to_words(r)),
        (0, p) => format!("{} Paise Only", two_digits(p)),
        (r, p) => format!("Rupees {} and {} Paise Only", integer_to_words(r), two_digits(p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_zero() {
        assert_eq!(amount_to_indian_words(Decimal::ZERO), "Zero Rupees Only");
    }

    #[test]
    fn test_small_numbers() {
        assert_eq!(amount_to_indian_words(dec("7")), "Rupees Seven Only");
        assert_eq!(amount_to_indian_words(dec("19")), "Rupees Nineteen Only");
        assert_eq!(amount_to_indian_words(dec("42")), "Rupees Forty Two Only");
        assert_eq!(amount_to_indian_words(dec("90")), "Rupees Ninety Only");
    }

    #[test]
    fn test_hundreds_and_thousands() {
        assert_eq!(amount_to_indian_words(dec("100")), "Rupees One Hundred Only");
        assert_eq!(
            amount_to_indian_words(dec("1234")),
            "Rupees One Thousand Two Hundred Thirty Four Only"
        );
        assert_eq!(
            amount_to_indian_words(dec("45000")),
            "Rupees Forty Five Thousand Only"
        );
    }

    #[test]
    fn test_lakh_and_crore_grouping() {
        assert_eq!(amount_to_indian_words(dec("100000")), "Rupees One Lakh Only");
        assert_eq!(
            amount_to_indian_words(dec("2550000")),
            "Rupees Twenty Five Lakh Fifty Thousand Only"
        );
        assert_eq!(amount_to_indian_words(dec("10000000")), "Rupees One Crore Only");
        assert_eq!(
            amount_to_indian_words(dec("12345678")),
            "Rupees One Crore Twenty Three Lakh Forty Five Thousand Six Hundred Seventy Eight Only"
        );
        // Más de 99 crore: agrupación recursiva
        assert_eq!(
            amount_to_indian_words(dec("1000000000")),
            "Rupees One Hundred Crore Only"
        );
    }

    #[test]
    fn test_paise() {
        assert_eq!(
            amount_to_indian_words(dec("1500.50")),
            "Rupees One Thousand Five Hundred and Fifty Paise Only"
        );
        assert_eq!(amount_to_indian_words(dec("0.75")), "Seventy Five Paise Only");
        // El redondeo a 2 decimales manda
        assert_eq!(
            amount_to_indian_words(dec("10.999")),
            "Rupees Eleven Only"
        );
    }
}
