//! MOVE transfer payloads and the transfer form state.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::traits::{SigningCapability, SigningError};

/// Entry function of a native coin transfer.
pub const TRANSFER_FUNCTION: &str = "0x1::aptos_account::transfer";

/// MOVE always has 8 decimals.
pub const MOVE_DECIMALS: u32 = 8;

/// Transfer error.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Enter recipient and amount")]
    MissingInput,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Transfer failed: {0}")]
    Signing(#[from] SigningError),
}

/// Entry function call handed to the wallet for signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub function: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<String>,
    pub function_arguments: Vec<String>,
}

/// A MOVE transfer as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub recipient: String,
    pub amount: String,
}

impl TransferRequest {
    #[must_use]
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    /// Build the transfer payload, amount converted to octas.
    ///
    /// # Errors
    /// Returns error if an input is empty or the amount is not a decimal number.
    pub fn payload(&self) -> Result<TransactionPayload, TransferError> {
        let recipient = self.recipient.trim();
        let amount = self.amount.trim();
        if recipient.is_empty() || amount.is_empty() {
            return Err(TransferError::MissingInput);
        }

        let octas = to_base_units(amount, MOVE_DECIMALS)?;
        Ok(TransactionPayload {
            function: TRANSFER_FUNCTION.to_string(),
            type_arguments: Vec::new(),
            function_arguments: vec![recipient.to_string(), octas.to_string()],
        })
    }
}

/// Convert a decimal amount to base units, dropping digits beyond `decimals`.
///
/// # Errors
/// Returns error if `amount` is not a non-negative decimal number or overflows.
pub fn to_base_units(amount: &str, decimals: u32) -> Result<u64, TransferError> {
    let invalid = || TransferError::InvalidAmount(amount.to_string());

    let (whole, frac) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let scale = 10u64.checked_pow(decimals).ok_or_else(invalid)?;
    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };

    let mut frac_units = 0u64;
    let mut place = scale;
    for digit in frac.bytes().take(decimals as usize) {
        place /= 10;
        frac_units += u64::from(digit - b'0') * place;
    }

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(invalid)
}

/// State of the transfer form between submit and the wallet redirect.
#[derive(Debug, Clone, Default)]
pub struct TransferForm {
    pub recipient: String,
    pub amount: String,
    submitting: bool,
}

impl TransferForm {
    #[must_use]
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Ask the wallet to sign the transfer and return the redirect URL.
    ///
    /// On failure the submitting flag is reset so the user can retry.
    ///
    /// # Errors
    /// Returns error if inputs are missing or invalid, or the signer refuses.
    pub fn submit(&mut self, signer: &dyn SigningCapability) -> Result<Url, TransferError> {
        let request = TransferRequest::new(self.recipient.clone(), self.amount.clone());
        if request.recipient.trim().is_empty() || request.amount.trim().is_empty() {
            return Err(TransferError::MissingInput);
        }

        self.submitting = true;
        let result = request
            .payload()
            .and_then(|payload| {
                signer
                    .sign_and_submit_transaction(&payload)
                    .map_err(TransferError::from)
            });

        match result {
            Ok(url) => {
                tracing::debug!(recipient = %request.recipient, "Transfer handed to wallet");
                Ok(url)
            }
            Err(e) => {
                tracing::warn!("Transfer failed: {e}");
                self.submitting = false;
                Err(e)
            }
        }
    }

    /// Clear the form once the user is back from the wallet.
    pub fn reset(&mut self) {
        self.recipient.clear();
        self.amount.clear();
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units("1", 8).unwrap(), 100_000_000);
        assert_eq!(to_base_units("1.5", 8).unwrap(), 150_000_000);
        assert_eq!(to_base_units(".25", 8).unwrap(), 25_000_000);
        assert_eq!(to_base_units("2.", 8).unwrap(), 200_000_000);
        assert_eq!(to_base_units("0.000000019", 8).unwrap(), 1);
        assert!(to_base_units("-1", 8).is_err());
        assert!(to_base_units("1e3", 8).is_err());
        assert!(to_base_units(".", 8).is_err());
        assert!(to_base_units("1.2.3", 8).is_err());
    }

    #[test]
    fn test_payload() {
        let payload = TransferRequest::new("0xB0B", "0.1").payload().unwrap();
        assert_eq!(payload.function, TRANSFER_FUNCTION);
        assert_eq!(payload.function_arguments, vec!["0xB0B", "10000000"]);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["functionArguments"][1], "10000000");
        assert!(json.get("typeArguments").is_none());
    }

    #[test]
    fn test_missing_input() {
        let err = TransferRequest::new("", "1").payload().unwrap_err();
        assert!(matches!(err, TransferError::MissingInput));
        assert_eq!(err.to_string(), "Enter recipient and amount");
    }
}
