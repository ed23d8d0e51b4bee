//! Run totals and the one-line summary.

use std::fmt;

use serde::Serialize;

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Convert bytes to megabytes (1024 * 1024 bytes).
pub fn to_megabytes(bytes: i64) -> f64 {
    bytes as f64 / BYTES_PER_MEGABYTE
}

/// Totals accumulated over one run.
///
/// `before_bytes` is the size of the inputs measured before any file was
/// touched; `after_bytes` is the size of every PNG/JPEG in the directory
/// measured after the last file was processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Inputs found by discovery, including skipped ones.
    pub considered: usize,
    /// Inputs replaced by a re-encoded file.
    pub optimized: usize,
    /// Inputs left untouched after a per-file error.
    pub skipped: usize,
    pub before_bytes: u64,
    pub after_bytes: u64,
}

impl RunReport {
    /// `before_bytes - after_bytes`; negative if the directory grew.
    pub fn savings_bytes(&self) -> i64 {
        self.before_bytes as i64 - self.after_bytes as i64
    }

    pub fn before_mb(&self) -> f64 {
        to_megabytes(self.before_bytes as i64)
    }

    pub fn after_mb(&self) -> f64 {
        to_megabytes(self.after_bytes as i64)
    }

    pub fn savings_mb(&self) -> f64 {
        to_megabytes(self.savings_bytes())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Optimized {} images. Total before: {:.2} MB, after: {:.2} MB, savings: {:.2} MB",
            self.considered,
            self.before_mb(),
            self.after_mb(),
            self.savings_mb()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings_arithmetic() {
        let report = RunReport {
            considered: 3,
            optimized: 2,
            skipped: 1,
            before_bytes: 5_000_000,
            after_bytes: 1_250_000,
        };
        assert_eq!(report.savings_bytes(), 3_750_000);
    }

    #[test]
    fn test_negative_savings() {
        let report = RunReport {
            before_bytes: 100,
            after_bytes: 150,
            ..Default::default()
        };
        assert_eq!(report.savings_bytes(), -50);
    }

    #[test]
    fn test_megabyte_conversion() {
        assert_eq!(to_megabytes(1024 * 1024), 1.0);
        assert_eq!(to_megabytes(512 * 1024), 0.5);
        assert_eq!(to_megabytes(0), 0.0);
    }

    #[test]
    fn test_summary_line() {
        let report = RunReport {
            considered: 42,
            optimized: 40,
            skipped: 2,
            before_bytes: 10 * 1024 * 1024,
            after_bytes: 3 * 1024 * 1024 + 512 * 1024,
        };
        assert_eq!(
            report.to_string(),
            "Optimized 42 images. Total before: 10.00 MB, after: 3.50 MB, savings: 6.50 MB"
        );
    }

    #[test]
    fn test_empty_summary_line() {
        assert_eq!(
            RunReport::default().to_string(),
            "Optimized 0 images. Total before: 0.00 MB, after: 0.00 MB, savings: 0.00 MB"
        );
    }
}
