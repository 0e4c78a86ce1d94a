//! Generación de números de serie con prefijo anual
//!
//! Formato: PREFIX-YYYY-NNNN (p. ej. TS-2026-0042). El ordinal se
//! obtiene contando las filas existentes con el prefijo del año en
//! curso; el índice único de la columna es el respaldo ante carreras.

use chrono::{Datelike, Utc};
use sqlx::PgPool;

use crate::utils::errors::AppResult;

/// Tablas con columna serial
#[derive(Debug, Clone, Copy)]
pub enum SerialTable {
    Tripsheets,
    Billings,
}

impl SerialTable {
    fn table_name(self) -> &'static str {
        match self {
            SerialTable::Tripsheets => "tripsheets",
            SerialTable::Billings => "billings",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            SerialTable::Tripsheets => "TS",
            SerialTable::Billings => "INV",
        }
    }
}

/// Formatear un número de serie
pub fn format_serial(prefix: &str, year: i32, ordinal: i64) -> String {
    format!("{}-{}-{:04}", prefix, year, ordinal)
}

/// Generar el siguiente número de serie del año en curso para la tabla
pub async fn next_serial(pool: &PgPool, table: SerialTable) -> AppResult<String> {
    let year = Utc::now().year();
    let like_pattern = format!("{}-{}-%", table.prefix(), year);

    // El nombre de tabla viene de un enum interno, nunca de entrada de usuario
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE serial LIKE $1",
        table.table_name()
    );
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(&like_pattern)
        .fetch_one(pool)
        .await?;

    Ok(format_serial(table.prefix(), year, count + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_format_serial_padding() {
        assert_eq!(format_serial("TS", 2026, 1), "TS-2026-0001");
        assert_eq!(format_serial("TS", 2026, 42), "TS-2026-0042");
        assert_eq!(format_serial("INV", 2026, 9999), "INV-2026-9999");
        // Por encima de 9999 el serial crece sin truncarse
        assert_eq!(format_serial("INV", 2026, 10001), "INV-2026-10001");
    }

    #[test]
    fn test_format_serial_matches_year_prefix_pattern() {
        let re = Regex::new(r"^TS-\d{4}-\d{4,}$").unwrap();
        assert!(re.is_match(&format_serial("TS", 2026, 7)));
    }
}
