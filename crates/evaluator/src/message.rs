// Rust guideline compliant 2026-10-14

//! Alert text: titles and messages embedding the offending metric and its threshold.
//!
//! Numbers are rendered the way the dashboard displays them: currency with
//! thousands separators and at most two fraction digits, runway and
//! percentages with exactly one decimal place.

use domain::{AlertKind, AlertThresholds, FinancialMetrics};

/// Title of the burn-rate alert.
pub const HIGH_BURN_RATE: &str = "High Burn Rate";
/// Title of the runway alert.
pub const LOW_CASH_RUNWAY: &str = "Low Cash Runway";
/// Title of the expense-growth alert.
pub const HIGH_EXPENSE_GROWTH: &str = "High Expense Growth";

/// One fired rule: severity, title and rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breach {
    /// Severity of the resulting alert.
    pub kind: AlertKind,
    /// Alert title.
    pub title: &'static str,
    /// Alert message.
    pub message: String,
}

/// Compare `metrics` against `thresholds`; return one [`Breach`] per fired rule.
///
/// Rules are independent and reported in a fixed order: burn rate, runway,
/// expense growth.
#[must_use]
pub fn breaches(metrics: &FinancialMetrics, thresholds: &AlertThresholds) -> Vec<Breach> {
    let mut fired = Vec::with_capacity(3);

    if metrics.burn_rate > thresholds.burn_rate {
        fired.push(Breach {
            kind: AlertKind::Danger,
            title: HIGH_BURN_RATE,
            message: format!(
                "Your monthly burn rate of {} exceeds the threshold of {}.",
                currency(metrics.burn_rate),
                currency(thresholds.burn_rate),
            ),
        });
    }

    if metrics.cash_runway < thresholds.cash_runway {
        fired.push(Breach {
            kind: AlertKind::Danger,
            title: LOW_CASH_RUNWAY,
            message: format!(
                "Your cash runway of {} months is below the minimum threshold of {} months.",
                one_decimal(metrics.cash_runway),
                one_decimal(thresholds.cash_runway),
            ),
        });
    }

    if metrics.expense_growth > thresholds.expense_growth {
        fired.push(Breach {
            kind: AlertKind::Warning,
            title: HIGH_EXPENSE_GROWTH,
            message: format!(
                "Your expense growth rate of {}% exceeds the threshold of {}%.",
                one_decimal(metrics.expense_growth),
                one_decimal(thresholds.expense_growth),
            ),
        });
    }

    fired
}

/// `$1,234.5` style: grouped integer part, up to two fraction digits, no trailing zeros.
#[must_use]
pub fn currency(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && rendered.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}${}", group_thousands(int_part))
    } else {
        format!("{sign}${}.{frac_part}", group_thousands(int_part))
    }
}

/// `1,234.5` style: grouped integer part, exactly one fraction digit.
#[must_use]
pub fn one_decimal(value: f64) -> String {
    let rendered = format!("{value:.1}");
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    match unsigned.split_once('.') {
        Some((int_part, frac_part)) => format!("{sign}{}.{frac_part}", group_thousands(int_part)),
        None => rendered.clone(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
