//! RANDOM strategy
//!
//! Mirrors the ASTERISK tables, drawing replacement characters from a
//! [`RandomSource`] instead of using `*`.

use datamask_core::{MaskingOptions, PiiType};

use super::char_len;
use crate::email;
use crate::random::RandomSource;

/// Structural placeholder for phone digits when the format is kept
const PHONE_DIGIT_PLACEHOLDER: char = 'X';

pub(crate) fn mask<R: RandomSource + ?Sized>(
    data: &str,
    pii_type: PiiType,
    options: MaskingOptions<'_>,
    random: &R,
) -> String {
    let len = char_len(data);
    match pii_type {
        PiiType::Email => mask_email(data, options.preserve_format, random),
        PiiType::Phone => {
            if options.preserve_format {
                data.chars()
                    .map(|c| {
                        if c.is_ascii_digit() {
                            PHONE_DIGIT_PLACEHOLDER
                        } else {
                            c
                        }
                    })
                    .collect()
            } else {
                random.alphanumeric(len)
            }
        }
        PiiType::TcKimlikNo => mask_tc_kimlik_no(data, random),
        PiiType::CreditCard => mask_credit_card(data, random),
        PiiType::FullName | PiiType::FirstName | PiiType::LastName | PiiType::Address => {
            random.alphanumeric(len)
        }
        PiiType::Ssn
        | PiiType::DateOfBirth
        | PiiType::IpAddress
        | PiiType::BankAccount
        | PiiType::Passport
        | PiiType::DriversLicense
        | PiiType::Text
        | PiiType::Numeric => {
            if options.preserve_length {
                random.alphanumeric(len)
            } else {
                random.alphanumeric(8)
            }
        }
    }
}

fn mask_email<R: RandomSource + ?Sized>(data: &str, preserve_format: bool, random: &R) -> String {
    let Some((local, domain)) = email::split(data) else {
        return random.alphanumeric(char_len(data));
    };

    let local_len = if preserve_format { char_len(local) } else { 8 };
    format!("{}@{}", random.alphanumeric(local_len), domain)
}

fn mask_tc_kimlik_no<R: RandomSource + ?Sized>(data: &str, random: &R) -> String {
    let chars: Vec<char> = data.chars().collect();
    if chars.len() != 11 {
        return random.numeric(chars.len());
    }

    let head: String = chars[..3].iter().collect();
    let tail: String = chars[7..].iter().collect();
    format!("{}{}{}", head, random.numeric(4), tail)
}

fn mask_credit_card<R: RandomSource + ?Sized>(data: &str, random: &R) -> String {
    let digits: Vec<char> = data.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return random.numeric(char_len(data));
    }

    let visible: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{}", random.numeric(digits.len() - 4), visible)
}
