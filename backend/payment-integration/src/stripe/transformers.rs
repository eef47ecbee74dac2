//! Wire shapes, fee math and error classification for the Stripe-style
//! gateway.

use common_enums::PaymentStatus;
use common_utils::{
    consts::NO_ERROR_MESSAGE,
    errors::{CustomResult, ParsingError},
    types::MinorUnit,
};
use domain_types::errors::GatewayError;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::configs::FeeSettings;

/// Wire shape of a gateway error response body.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: ErrorDetails,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ErrorDetails {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub decline_code: Option<String>,
    pub message: Option<String>,
}

impl ErrorDetails {
    pub fn display_message(&self) -> String {
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| NO_ERROR_MESSAGE.to_string());
        match &self.decline_code {
            Some(decline_code) => format!("message - {message}, decline_code - {decline_code}"),
            None => message,
        }
    }
}

/// Classify an HTTP-level gateway rejection into the fixed taxonomy.
/// Card declines win over status-code classes since the gateway
/// reports them with a 402/400 status.
pub fn classify_http_error(status_code: u16, details: &ErrorDetails) -> GatewayError {
    let is_card_error =
        details.error_type.as_deref() == Some("card_error") || details.decline_code.is_some();
    if is_card_error {
        return GatewayError::CardDeclined {
            message: details.display_message(),
        };
    }

    match status_code {
        429 => GatewayError::RateLimited,
        401 | 403 => GatewayError::AuthFailure,
        400 | 404 => GatewayError::InvalidRequest {
            message: details.display_message(),
        },
        _ => GatewayError::Unknown {
            message: details.display_message(),
        },
    }
}

/// Gateway base fee: `amount × percent + fixed`, in minor units.
pub fn base_fee_amount(
    amount: MinorUnit,
    fees: &FeeSettings,
) -> CustomResult<MinorUnit, ParsingError> {
    let percent_part = Decimal::from(amount.get_amount_as_i64()) * fees.percent
        / Decimal::ONE_HUNDRED;
    let percent_part = percent_part
        .round()
        .to_i64()
        .ok_or_else(|| error_stack::report!(ParsingError::DecimalToI64ConversionFailure))?;
    Ok(MinorUnit::new(percent_part) + fees.fixed)
}

/// Marketplace application fee: `amount × commission_percent`, `None`
/// when no commission is configured for the site.
pub fn application_fee_amount(
    amount: MinorUnit,
    fees: &FeeSettings,
) -> CustomResult<Option<MinorUnit>, ParsingError> {
    if fees.commission_percent.is_zero() {
        return Ok(None);
    }
    let fee = Decimal::from(amount.get_amount_as_i64()) * fees.commission_percent
        / Decimal::ONE_HUNDRED;
    let fee = fee
        .round()
        .to_i64()
        .ok_or_else(|| error_stack::report!(ParsingError::DecimalToI64ConversionFailure))?;
    Ok(Some(MinorUnit::new(fee)))
}

/// Payment status for a created charge: captured charges settle
/// immediately, the rest hold an authorization.
pub fn charge_payment_status(captured: bool) -> PaymentStatus {
    if captured {
        PaymentStatus::Captured
    } else {
        PaymentStatus::Authorized
    }
}
