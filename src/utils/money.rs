// Utilitários para exibição de valores e cartões

use rust_decimal::Decimal;

pub fn format_brl(amount: Decimal) -> String {
    format!("R$ {:.2}", amount)
}

/// Keeps only the last four characters of the card number.
pub fn mask_card_number(card_number: &str) -> String {
    let digits: Vec<char> = card_number.chars().collect();
    let visible: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("**** **** **** {}", visible)
}
