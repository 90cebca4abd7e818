pub mod money;

pub use money::{format_brl, mask_card_number};
