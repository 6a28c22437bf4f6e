//! Money helpers. All amounts are integer minor units (Kenyan shilling cents).

/// Amount in cents.
pub type Cents = u64;

/// Basis points in one whole (100%).
pub const BPS_SCALE: u64 = 10_000;

/// Applies a basis-point rate and rounds half up.
pub fn apply_rate(amount: Cents, rate_bps: u32) -> Cents {
    let scaled = amount as u128 * rate_bps as u128;
    ((scaled + (BPS_SCALE as u128 / 2)) / BPS_SCALE as u128) as Cents
}

/// Formats cents as `KES 1,234.50`.
pub fn format_kes(amount: Cents) -> String {
    let shillings = (amount / 100).to_string();
    let mut grouped = String::with_capacity(shillings.len() + shillings.len() / 3);
    for (i, ch) in shillings.chars().enumerate() {
        if i > 0 && (shillings.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("KES {}.{:02}", grouped, amount % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_rate_rounds_half_up() {
        assert_eq!(apply_rate(100_000, 1000), 10_000);
        assert_eq!(apply_rate(5, 1000), 1);
        assert_eq!(apply_rate(4, 1000), 0);
        assert_eq!(apply_rate(0, 1000), 0);
    }

    #[test]
    fn test_format_kes() {
        assert_eq!(format_kes(0), "KES 0.00");
        assert_eq!(format_kes(123_456_789), "KES 1,234,567.89");
        assert_eq!(format_kes(99_950), "KES 999.50");
    }
}
