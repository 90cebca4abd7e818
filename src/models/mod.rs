pub mod payment;
pub mod response;

pub use payment::{CreditCardDetails, PaymentMethod, PaymentRequest, ValidationError};
pub use response::{error_codes, PaymentResponse, PaymentStatus};
