//! Amount types shared between the order core and gateway integrations.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Sub},
};

use common_enums::Currency;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::errors::ParsingError;

/// Amount convertor trait for gateway integrations. The core works in
/// [`MajorUnit`]; each gateway declares the representation it accepts.
pub trait AmountConvertor: Send {
    /// Output type for the gateway
    type Output;
    /// Convert a core amount into the gateway representation
    fn convert(
        &self,
        amount: MajorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>>;

    /// Convert a gateway amount back into the core representation
    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<MajorUnit, error_stack::Report<ParsingError>>;
}

/// Gateways that charge in the smallest currency unit.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct MinorUnitForConnector;

impl AmountConvertor for MinorUnitForConnector {
    type Output = MinorUnit;
    fn convert(
        &self,
        amount: MajorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        convert_decimal_to_integer(amount, currency)
    }

    fn convert_back(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<MajorUnit, error_stack::Report<ParsingError>> {
        Ok(convert_integer_to_decimal(amount, currency))
    }
}

/// Gateways that accept decimal major-unit amounts unchanged.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct MajorUnitForConnector;

impl AmountConvertor for MajorUnitForConnector {
    type Output = MajorUnit;
    fn convert(
        &self,
        amount: MajorUnit,
        _currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        Ok(amount)
    }

    fn convert_back(
        &self,
        amount: MajorUnit,
        _currency: Currency,
    ) -> Result<MajorUnit, error_stack::Report<ParsingError>> {
        Ok(amount)
    }
}

/// Concatenate the integer and fractional digits of a decimal amount
/// into a minor-unit integer (`10.55 -> 1055` for two-exponent
/// currencies). Fails when the amount carries more fractional digits
/// than the currency exponent allows, so the inverse stays exact.
pub fn convert_decimal_to_integer(
    amount: MajorUnit,
    currency: Currency,
) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
    let scaled = amount.0 * Decimal::from(currency.minor_unit_factor());
    if !scaled.is_integer() {
        return Err(error_stack::report!(ParsingError::DecimalPrecisionExceeded));
    }
    let value = scaled
        .to_i64()
        .ok_or_else(|| error_stack::report!(ParsingError::DecimalToI64ConversionFailure))?;
    Ok(MinorUnit::new(value))
}

/// Exact inverse of [`convert_decimal_to_integer`].
pub fn convert_integer_to_decimal(amount: MinorUnit, currency: Currency) -> MajorUnit {
    MajorUnit::new(Decimal::from(amount.0) / Decimal::from(currency.minor_unit_factor()))
}

/// This Unit struct represents MinorUnit in which gateway amounts work
#[derive(
    Default,
    Debug,
    serde::Deserialize,
    serde::Serialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
pub struct MinorUnit(pub i64);

impl MinorUnit {
    /// forms a new minor default unit i.e zero
    pub fn zero() -> Self {
        Self(0)
    }

    /// forms a new minor unit from amount
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// gets amount as i64 value
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    /// checks if the amount is greater than the given value
    pub fn is_greater_than(&self, value: i64) -> bool {
        self.get_amount_as_i64() > value
    }
}

impl Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for MinorUnit {
    type Output = Self;
    fn add(self, a2: Self) -> Self {
        Self(self.0 + a2.0)
    }
}

impl Sub for MinorUnit {
    type Output = Self;
    fn sub(self, a2: Self) -> Self {
        Self(self.0 - a2.0)
    }
}

impl Mul<u16> for MinorUnit {
    type Output = Self;

    fn mul(self, a2: u16) -> Self::Output {
        Self(self.0 * i64::from(a2))
    }
}

impl Sum for MinorUnit {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self(0), |a, b| a + b)
    }
}

/// Decimal major-unit amount the order core computes totals in.
#[derive(
    Default,
    Debug,
    serde::Deserialize,
    serde::Serialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
)]
pub struct MajorUnit(pub Decimal);

impl MajorUnit {
    /// forms a new major default unit i.e zero
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// forms a new major unit from a decimal amount
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// gets the inner decimal amount
    pub fn get_amount_as_decimal(self) -> Decimal {
        self.0
    }

    /// computes `rate` percent of this amount, rounded to two places
    pub fn percent(self, rate: Decimal) -> Self {
        Self((self.0 * rate / Decimal::ONE_HUNDRED).round_dp(2))
    }

    /// scales this amount by an integer quantity
    pub fn times(self, quantity: u16) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Display for MajorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for MajorUnit {
    type Output = Self;
    fn add(self, a2: Self) -> Self {
        Self(self.0 + a2.0)
    }
}

impl Sub for MajorUnit {
    type Output = Self;
    fn sub(self, a2: Self) -> Self {
        Self(self.0 - a2.0)
    }
}

impl Sum for MajorUnit {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self(Decimal::ZERO), |a, b| a + b)
    }
}
