//! ASTERISK strategy

use datamask_core::{MaskingOptions, PiiType};

use super::{char_len, stars};
use crate::email;

/// Replace the informative characters of `data` with `*`
pub(crate) fn mask(data: &str, pii_type: PiiType, options: MaskingOptions<'_>) -> String {
    match pii_type {
        PiiType::Email => mask_email(data, options.preserve_format),
        PiiType::Phone => mask_phone(data, options.preserve_format),
        PiiType::TcKimlikNo => mask_tc_kimlik_no(data),
        PiiType::CreditCard => mask_credit_card(data),
        PiiType::FullName | PiiType::FirstName | PiiType::LastName => mask_name(data),
        PiiType::Address => stars(char_len(data)),
        PiiType::Ssn
        | PiiType::DateOfBirth
        | PiiType::IpAddress
        | PiiType::BankAccount
        | PiiType::Passport
        | PiiType::DriversLicense
        | PiiType::Text
        | PiiType::Numeric => {
            if options.preserve_length {
                stars(char_len(data))
            } else {
                stars(8)
            }
        }
    }
}

fn mask_email(data: &str, preserve_format: bool) -> String {
    let Some((local, domain)) = email::split(data) else {
        return stars(char_len(data));
    };

    if !preserve_format {
        return format!("***@{}", domain);
    }

    let local_len = char_len(local);
    let masked_local = if local_len > 2 {
        let mut chars = local.chars();
        let first = chars.next().unwrap_or('*');
        let last = chars.next_back().unwrap_or('*');
        format!("{}{}{}", first, stars(local_len - 2), last)
    } else {
        stars(local_len)
    };

    format!("{}@{}", masked_local, domain)
}

fn mask_phone(data: &str, preserve_format: bool) -> String {
    if preserve_format {
        data.chars()
            .map(|c| if c.is_ascii_digit() { '*' } else { c })
            .collect()
    } else {
        stars(char_len(data))
    }
}

fn mask_tc_kimlik_no(data: &str) -> String {
    let chars: Vec<char> = data.chars().collect();
    if chars.len() != 11 {
        return stars(chars.len());
    }

    let head: String = chars[..3].iter().collect();
    let tail: String = chars[7..].iter().collect();
    format!("{}****{}", head, tail)
}

/// Separators are dropped: the output length is the digit count, not the input length
fn mask_credit_card(data: &str) -> String {
    let digits: Vec<char> = data.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return stars(char_len(data));
    }

    let visible: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{}", stars(digits.len() - 4), visible)
}

fn mask_name(data: &str) -> String {
    let len = char_len(data);
    if len <= 2 {
        return stars(len);
    }

    let first = data.chars().next().unwrap_or('*');
    format!("{}{}", first, stars(len - 1))
}
