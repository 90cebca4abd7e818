use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "BRL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "PaymentRequestPayload", try_from = "PaymentRequestPayload")]
pub struct PaymentRequest {
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: String,
    /// CPF/CNPJ. Required for bank slips.
    pub customer_document: String,
    pub method: PaymentMethod,
    /// Passed through to the gateway, never called from here.
    pub callback_url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentMethod {
    CreditCard(CreditCardDetails),
    BankSlip,
    Pix { key: String },
}

impl PaymentMethod {
    pub fn kind(&self) -> PaymentMethodKind {
        match self {
            PaymentMethod::CreditCard(_) => PaymentMethodKind::CreditCard,
            PaymentMethod::BankSlip => PaymentMethodKind::BankSlip,
            PaymentMethod::Pix { .. } => PaymentMethodKind::Pix,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethodKind {
    CreditCard,
    BankSlip,
    Pix,
}

impl std::fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentMethodKind::CreditCard => "CreditCard",
            PaymentMethodKind::BankSlip => "BankSlip",
            PaymentMethodKind::Pix => "Pix",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardDetails {
    pub card_number: String,
    pub holder_name: String,
    /// `MM/YY`
    #[serde(rename = "expirationDate")]
    pub expiration: String,
    pub cvv: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("order id is empty")]
    EmptyOrderId,
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("customer name and email are required")]
    MissingCustomer,
    #[error("credit card: {0}")]
    Card(#[from] CardError),
    #[error("PIX key is empty")]
    MissingPixKey,
    #[error("customer document is required for bank slips")]
    MissingCustomerDocument,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("card number must have 13 to 19 characters, got {0}")]
    NumberLength(usize),
    #[error("holder name is empty")]
    EmptyHolderName,
    #[error("expiration must be MM/YY")]
    MalformedExpiration,
    #[error("expiration month {0} is out of range")]
    InvalidMonth(u32),
    #[error("CVV must have 3 or 4 characters, got {0}")]
    CvvLength(usize),
    #[error("card expired")]
    Expired,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl CreditCardDetails {
    pub fn validate_at(&self, today: NaiveDate) -> bool {
        self.check_at(today).is_ok()
    }

    pub fn check_at(&self, today: NaiveDate) -> Result<(), CardError> {
        let number_len = self.card_number.chars().count();
        if is_blank(&self.card_number) || !(13..=19).contains(&number_len) {
            return Err(CardError::NumberLength(number_len));
        }

        if is_blank(&self.holder_name) {
            return Err(CardError::EmptyHolderName);
        }

        let cvv_len = self.cvv.chars().count();
        if is_blank(&self.cvv) || !(3..=4).contains(&cvv_len) {
            return Err(CardError::CvvLength(cvv_len));
        }

        if self.expires_on()? > today {
            Ok(())
        } else {
            Err(CardError::Expired)
        }
    }

    /// Last day of the expiration month, reading `YY` as `20YY`.
    pub fn expires_on(&self) -> Result<NaiveDate, CardError> {
        let mut parts = self.expiration.split('/');
        let (month, year) = match (parts.next(), parts.next(), parts.next()) {
            (Some(month), Some(year), None) => (month.trim(), year.trim()),
            _ => return Err(CardError::MalformedExpiration),
        };

        let month: u32 = month.parse().map_err(|_| CardError::MalformedExpiration)?;
        let year: i32 = year.parse().map_err(|_| CardError::MalformedExpiration)?;

        if !(1..=12).contains(&month) {
            return Err(CardError::InvalidMonth(month));
        }

        let year = year.checked_add(2000).ok_or(CardError::MalformedExpiration)?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };

        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .ok_or(CardError::MalformedExpiration)
    }
}

impl PaymentRequest {
    pub fn validate(&self) -> bool {
        self.check().is_ok()
    }

    pub fn validate_at(&self, today: NaiveDate) -> bool {
        self.check_at(today).is_ok()
    }

    /// Same rules as [`validate`](Self::validate), reporting the first one that failed.
    pub fn check(&self) -> Result<(), ValidationError> {
        self.check_at(Local::now().date_naive())
    }

    pub fn check_at(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if is_blank(&self.order_id) {
            return Err(ValidationError::EmptyOrderId);
        }

        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }

        if is_blank(&self.customer_name) || is_blank(&self.customer_email) {
            return Err(ValidationError::MissingCustomer);
        }

        match &self.method {
            PaymentMethod::CreditCard(card) => card.check_at(today)?,
            PaymentMethod::Pix { key } if is_blank(key) => {
                return Err(ValidationError::MissingPixKey)
            }
            PaymentMethod::Pix { .. } => {}
            PaymentMethod::BankSlip if is_blank(&self.customer_document) => {
                return Err(ValidationError::MissingCustomerDocument)
            }
            PaymentMethod::BankSlip => {}
        }

        Ok(())
    }
}

// Corpo JSON enviado ao gateway: discriminante + campos anuláveis por método
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentRequestPayload {
    #[serde(default)]
    order_id: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    amount: Decimal,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default)]
    customer_name: String,
    #[serde(default)]
    customer_email: String,
    #[serde(default)]
    customer_document: String,
    payment_method: PaymentMethodKind,
    #[serde(default)]
    credit_card_info: Option<CreditCardDetails>,
    #[serde(default)]
    pix_key: Option<String>,
    #[serde(default)]
    callback_url: String,
    #[serde(default)]
    description: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Error, Debug)]
#[error("paymentMethod {0} requires {1}")]
pub struct MissingMethodPayload(PaymentMethodKind, &'static str);

impl From<PaymentRequest> for PaymentRequestPayload {
    fn from(request: PaymentRequest) -> Self {
        let payment_method = request.method.kind();
        let (credit_card_info, pix_key) = match request.method {
            PaymentMethod::CreditCard(card) => (Some(card), None),
            PaymentMethod::Pix { key } => (None, Some(key)),
            PaymentMethod::BankSlip => (None, None),
        };

        Self {
            order_id: request.order_id,
            amount: request.amount,
            currency: request.currency,
            customer_name: request.customer_name,
            customer_email: request.customer_email,
            customer_document: request.customer_document,
            payment_method,
            credit_card_info,
            pix_key,
            callback_url: request.callback_url,
            description: request.description,
        }
    }
}

impl TryFrom<PaymentRequestPayload> for PaymentRequest {
    type Error = MissingMethodPayload;

    fn try_from(payload: PaymentRequestPayload) -> Result<Self, Self::Error> {
        let method = match payload.payment_method {
            PaymentMethodKind::CreditCard => PaymentMethod::CreditCard(
                payload
                    .credit_card_info
                    .ok_or(MissingMethodPayload(PaymentMethodKind::CreditCard, "creditCardInfo"))?,
            ),
            PaymentMethodKind::Pix => PaymentMethod::Pix {
                key: payload.pix_key.unwrap_or_default(),
            },
            PaymentMethodKind::BankSlip => PaymentMethod::BankSlip,
        };

        Ok(Self {
            order_id: payload.order_id,
            amount: payload.amount,
            currency: payload.currency,
            customer_name: payload.customer_name,
            customer_email: payload.customer_email,
            customer_document: payload.customer_document,
            method,
            callback_url: payload.callback_url,
            description: payload.description,
        })
    }
}
