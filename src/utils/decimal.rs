use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::{FromPrimitive, ToPrimitive};

/// Upstream money fields arrive as decimal strings ("1000.00") or bare numbers.
pub trait BigDecimalHelpers {
    fn to_paise_or_zero(&self) -> i64;
    fn to_f64_or_zero(&self) -> f64;
}

impl BigDecimalHelpers for BigDecimal {
    fn to_paise_or_zero(&self) -> i64 {
        (self * BigDecimal::from(100))
            .with_scale_round(0, RoundingMode::HalfUp)
            .to_i64()
            .unwrap_or(0)
    }

    fn to_f64_or_zero(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}

impl BigDecimalHelpers for Option<BigDecimal> {
    fn to_paise_or_zero(&self) -> i64 {
        self.as_ref().map(|bd| bd.to_paise_or_zero()).unwrap_or(0)
    }

    fn to_f64_or_zero(&self) -> f64 {
        self.as_ref().map(|bd| bd.to_f64_or_zero()).unwrap_or(0.0)
    }
}

pub fn paise_to_decimal(paise: i64) -> BigDecimal {
    BigDecimal::new(paise.into(), 2)
}

pub fn rupees_to_decimal(rupees: f64) -> BigDecimal {
    BigDecimal::from_f64(rupees)
        .map(|bd| bd.with_scale_round(2, RoundingMode::HalfUp))
        .unwrap_or_default()
}
