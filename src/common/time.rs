// src/common/time.rs

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};

// Internamente tudo é armazenado como instante absoluto (UTC); a formatação
// com fuso configurável acontece só na fronteira da resposta.
#[derive(Debug, Clone, Copy)]
pub struct TimeFormatter {
    offset: FixedOffset,
}

impl TimeFormatter {
    pub fn new(offset_hours: i32) -> anyhow::Result<Self> {
        let offset = FixedOffset::east_opt(offset_hours * 3600)
            .context("TZ_OFFSET_HOURS fora do intervalo permitido")?;
        Ok(Self { offset })
    }

    pub fn format(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format("%d/%m/%Y %H:%M:%S")
            .to_string()
    }

    pub fn format_opt(&self, instant: Option<DateTime<Utc>>) -> Option<String> {
        instant.map(|value| self.format(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_in_configured_offset() {
        let formatter = TimeFormatter::new(-3).unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 2, 30, 0).unwrap();
        // 02:30 UTC em UTC-3 ainda é o dia anterior.
        assert_eq!(formatter.format(instant), "31/05/2024 23:30:00");
    }

    #[test]
    fn formats_utc_when_offset_is_zero() {
        let formatter = TimeFormatter::new(0).unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 12, 25, 18, 5, 9).unwrap();
        assert_eq!(formatter.format(instant), "25/12/2024 18:05:09");
    }

    #[test]
    fn rejects_offset_out_of_range() {
        assert!(TimeFormatter::new(99).is_err());
    }
}
