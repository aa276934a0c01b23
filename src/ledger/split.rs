use crate::error::AppError;

/// Platform commission rate in basis points.
const COMMISSION_RATE_BPS: i128 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub platform_commission: i64,
    pub provider_payout: i64,
}

/// Split a booking total into commission and payout, in minor currency
/// units. The commission is the rate rounded half-up; the payout is the
/// remainder, so `platform_commission + provider_payout == total_amount`
/// holds exactly for every amount.
pub fn compute_split(total_amount: i64) -> Result<Split, AppError> {
    if total_amount < 0 {
        return Err(AppError::BadRequest(format!(
            "total_amount must be >= 0, got {total_amount}"
        )));
    }

    let platform_commission =
        ((total_amount as i128 * COMMISSION_RATE_BPS + 5_000) / 10_000) as i64;

    Ok(Split {
        platform_commission,
        provider_payout: total_amount - platform_commission,
    })
}
