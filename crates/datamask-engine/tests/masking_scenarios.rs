//! End-to-end masking scenarios and behavioural properties

use datamask_core::{MaskingRequest, MaskingResponse, MaskingStrategy, PiiType};
use datamask_engine::{Masker, MaskingEngine, SeededRandom};

fn mask(request: MaskingRequest) -> MaskingResponse {
    MaskingEngine::with_random(SeededRandom::new(2024)).mask(&request)
}

fn masked(request: MaskingRequest) -> String {
    let response = mask(request);
    assert!(response.success, "unexpected failure: {:?}", response.error_message);
    response.masked_data.expect("masked data present")
}

const SAMPLES: &[&str] = &[
    "a",
    "ab",
    "abc",
    "john.doe@example.com",
    "+90 555 123 4567",
    "12345678901",
    "4532 1234 5678 9012",
    "Ahmet Yılmaz",
    "İstiklal Cad. No:1 Beyoğlu",
    "sensitive data",
];

#[test]
fn scenario_email_asterisk() {
    let request = MaskingRequest::new("john.doe@example.com", PiiType::Email, MaskingStrategy::Asterisk)
        .with_preserve_format(true);
    assert_eq!(masked(request), "j******e@example.com");
}

#[test]
fn scenario_phone_asterisk() {
    let request = MaskingRequest::new("+90 555 123 4567", PiiType::Phone, MaskingStrategy::Asterisk)
        .with_preserve_format(true);
    assert_eq!(masked(request), "+** *** *** ****");
}

#[test]
fn scenario_tc_kimlik_no_asterisk() {
    let request = MaskingRequest::new("12345678901", PiiType::TcKimlikNo, MaskingStrategy::Asterisk);
    assert_eq!(masked(request), "123****8901");
}

#[test]
fn scenario_credit_card_asterisk() {
    let request =
        MaskingRequest::new("4532 1234 5678 9012", PiiType::CreditCard, MaskingStrategy::Asterisk);
    assert_eq!(masked(request), "************9012");
}

#[test]
fn scenario_text_hash() {
    let first = masked(MaskingRequest::new("sensitive data", PiiType::Text, MaskingStrategy::Hash));
    let second = masked(MaskingRequest::new("sensitive data", PiiType::Text, MaskingStrategy::Hash));

    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
    assert!(first.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
}

#[test]
fn scenario_text_placeholder() {
    let request = MaskingRequest::new("sensitive data", PiiType::Text, MaskingStrategy::Placeholder)
        .with_replacement_value("[CUSTOM_MASKED]");
    assert_eq!(masked(request), "[CUSTOM_MASKED]");
}

#[test]
fn scenario_numeric_partial() {
    let request = MaskingRequest::new("1234567890", PiiType::Numeric, MaskingStrategy::Partial);
    assert_eq!(masked(request), "12******90");
}

#[test]
fn scenario_empty_text_asterisk() {
    let request = MaskingRequest::new("", PiiType::Text, MaskingStrategy::Asterisk);
    assert_eq!(masked(request), "");
}

#[test]
fn property_pass_through() {
    for pii_type in PiiType::ALL {
        for strategy in MaskingStrategy::ALL {
            let response = mask(MaskingRequest::absent(pii_type, strategy));
            assert!(response.success);
            assert_eq!(response.masked_data, None);

            let response = mask(MaskingRequest::new("", pii_type, strategy));
            assert!(response.success);
            assert_eq!(response.masked_data.as_deref(), Some(""));
        }
    }
}

#[test]
fn property_asterisk_length_for_ids_and_names() {
    let tc = masked(MaskingRequest::new("98765432109", PiiType::TcKimlikNo, MaskingStrategy::Asterisk));
    assert_eq!(tc.chars().count(), 11);

    for pii_type in [PiiType::FullName, PiiType::FirstName, PiiType::LastName] {
        for sample in SAMPLES {
            let out = masked(MaskingRequest::new(*sample, pii_type, MaskingStrategy::Asterisk));
            assert_eq!(out.chars().count(), sample.chars().count(), "{} / {}", pii_type, sample);
        }
    }
}

#[test]
fn property_hash_never_echoes_input() {
    for sample in SAMPLES {
        let out = masked(MaskingRequest::new(*sample, PiiType::Text, MaskingStrategy::Hash));
        assert_ne!(out, *sample);
        assert_eq!(out.len(), 64);
    }
}

#[test]
fn property_nullify_is_absent() {
    for sample in SAMPLES {
        let response = mask(MaskingRequest::new(*sample, PiiType::Email, MaskingStrategy::Nullify));
        assert!(response.success);
        assert!(response.masked_data.is_none());
    }
}

#[test]
fn property_placeholder_literal() {
    for pii_type in PiiType::ALL {
        let out = masked(
            MaskingRequest::new("anything", pii_type, MaskingStrategy::Placeholder)
                .with_replacement_value("<gone>"),
        );
        assert_eq!(out, "<gone>");
    }
}

#[test]
fn property_partial_shape() {
    for sample in SAMPLES {
        let out = masked(MaskingRequest::new(*sample, PiiType::Text, MaskingStrategy::Partial));
        let input: Vec<char> = sample.chars().collect();
        let output: Vec<char> = out.chars().collect();
        assert_eq!(output.len(), input.len());

        if input.len() <= 2 {
            assert!(output.iter().all(|c| *c == '*'));
            continue;
        }

        let visible = (input.len() / 4).max(1);
        assert_eq!(output[..visible], input[..visible]);
        assert_eq!(output[input.len() - visible..], input[input.len() - visible..]);
        assert!(output[visible..input.len() - visible].iter().all(|c| *c == '*'));
    }
}

#[test]
fn property_email_domain_retained() {
    for email in ["john.doe@example.com", "a@b.io", "x_y+z@mail.example.co.uk"] {
        for preserve_format in [true, false] {
            let out = masked(
                MaskingRequest::new(email, PiiType::Email, MaskingStrategy::Asterisk)
                    .with_preserve_format(preserve_format),
            );
            assert_eq!(out.split_once('@').unwrap().1, email.split_once('@').unwrap().1);
        }
    }
}

#[test]
fn property_phone_format_preserved() {
    for phone in ["+90 555 123 4567", "(0212) 555-01-01", "555.123.4567"] {
        let out = masked(
            MaskingRequest::new(phone, PiiType::Phone, MaskingStrategy::Asterisk)
                .with_preserve_format(true),
        );
        assert_eq!(out.chars().count(), phone.chars().count());
        for (i, o) in phone.chars().zip(out.chars()) {
            if i.is_ascii_digit() {
                assert_eq!(o, '*');
            } else {
                assert_eq!(o, i);
            }
        }
    }
}

#[test]
fn property_credit_card_last_four() {
    for card in ["4532 1234 5678 9012", "5500-0000-0000-0004", "378282246310005"] {
        let out = masked(MaskingRequest::new(card, PiiType::CreditCard, MaskingStrategy::Asterisk));
        let digits: String = card.chars().filter(|c| c.is_ascii_digit()).collect();
        assert_eq!(&out[out.len() - 4..], &digits[digits.len() - 4..]);
        assert_eq!(out.len(), digits.len());
    }
}

#[test]
fn property_preserve_length_for_random_and_asterisk() {
    let length_bound = [
        PiiType::Phone,
        PiiType::TcKimlikNo,
        PiiType::FullName,
        PiiType::Address,
        PiiType::Ssn,
        PiiType::Text,
        PiiType::Numeric,
    ];
    for pii_type in length_bound {
        for strategy in [
            MaskingStrategy::Asterisk,
            MaskingStrategy::Random,
            MaskingStrategy::FormatPreserving,
        ] {
            for sample in SAMPLES {
                let out = masked(MaskingRequest::new(*sample, pii_type, strategy));
                assert_eq!(
                    out.chars().count(),
                    sample.chars().count(),
                    "{} / {} / {}",
                    pii_type,
                    strategy,
                    sample
                );
            }
        }
    }
}

#[test]
fn property_random_may_differ_between_calls() {
    let engine = MaskingEngine::new();
    let request = MaskingRequest::new(
        "a fairly long sentence with enough entropy to differ",
        PiiType::Text,
        MaskingStrategy::Random,
    );
    let outputs: Vec<_> = (0..5).map(|_| engine.mask(&request).masked_data).collect();
    assert!(outputs.windows(2).any(|w| w[0] != w[1]));
}
