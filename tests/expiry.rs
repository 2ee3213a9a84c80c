mod common;

use chrono::{DateTime, Duration, Utc};
use common::*;
use ssotoken::{Claims, Error, Result, TokenValidator, VerificationResult};

fn verify_with(
    validator: &TokenValidator,
    token: &str,
    now: DateTime<Utc>,
) -> Result<VerificationResult> {
    let keys = keys();
    validator.verify::<Claims>(token, &keys.signing_public(), &keys.payload_private(), now)
}

#[test]
fn test_boundary_is_exclusive() {
    let expires_at = sample_claims().expires_at.unwrap();
    let token = issue(&sample_claims(), issued_at());

    assert!(matches!(
        verify(&token, expires_at),
        Err(Error::Expired { .. })
    ));

    let verified = verify(&token, expires_at - Duration::microseconds(1)).unwrap();
    assert!(!verified.expired);
}

#[test]
fn test_expired_error_reports_times() {
    let token = issue(&sample_claims(), issued_at());
    let now = at("2025-08-30T10:00:00Z");

    match verify(&token, now) {
        Err(Error::Expired { expires_at, now: reported }) => {
            assert_eq!(expires_at, at("2025-08-30T09:41:36Z"));
            assert_eq!(reported, now);
        }
        other => panic!("expected Expired, got {other:?}"),
    }
}

#[test]
fn test_clock_skew_extends_validity() {
    let token = issue(&sample_claims(), issued_at());
    let thirty_seconds_late = at("2025-08-30T09:42:06Z");

    let strict = TokenValidator::new();
    assert!(verify_with(&strict, &token, thirty_seconds_late).is_err());

    let lenient = TokenValidator::new().clock_skew(60).build();
    assert!(verify_with(&lenient, &token, thirty_seconds_late).is_ok());

    let tight = TokenValidator::new().clock_skew(30).build();
    assert!(matches!(
        verify_with(&tight, &token, thirty_seconds_late),
        Err(Error::Expired { .. })
    ));
}

#[test]
fn test_clock_skew_is_capped() {
    let token = issue(&sample_claims(), issued_at());
    let validator = TokenValidator::new().clock_skew(3600).build();

    let error = verify_with(&validator, &token, valid_now()).unwrap_err();

    assert!(matches!(error, Error::ClockSkewTooLarge { value: 3600, max: 300 }));
    assert!(!error.is_rejection());
}

#[test]
fn test_allow_expired_flags_instead_of_rejecting() {
    let token = issue(&sample_claims(), issued_at());
    let validator = TokenValidator::new().allow_expired().build();

    let verified = verify_with(&validator, &token, at("2025-08-30T10:00:00Z")).unwrap();
    assert!(verified.expired);
    assert_eq!(verified.claims, sample_claims());

    let verified = verify_with(&validator, &token, valid_now()).unwrap();
    assert!(!verified.expired);
}

#[test]
fn test_expiry_checked_only_after_signature() {
    // An expired token with a bad signature reports the signature
    let token = issue(&sample_claims(), issued_at());
    let (header, payload, _) = segments(&token);
    let (_, _, foreign_signature) = segments(&issue(&sample_claims(), issued_at()));
    let forged = format!("{header}.{payload}.{foreign_signature}");

    assert!(matches!(
        verify(&forged, at("2030-01-01T00:00:00Z")),
        Err(Error::SignatureInvalid)
    ));
}

#[test]
fn test_expiry_checked_only_after_decryption() {
    let keys = other_keys();
    let token = ssotoken::issue(
        &sample_claims(),
        &common::keys().signing_private(),
        &keys.payload_public(),
        issued_at(),
    )
    .unwrap()
    .to_string();

    // Encrypted for another service and long expired: decryption fails first
    assert!(matches!(
        verify(&token, at("2030-01-01T00:00:00Z")),
        Err(Error::DecryptionFailed)
    ));
}

#[test]
fn test_sub_second_expiry_round_trips() {
    let expires_at = at("2025-08-30T09:41:36.250Z");
    let claims = Claims::new("DS123456", expires_at);
    let token = issue(&claims, issued_at());

    assert!(verify(&token, at("2025-08-30T09:41:36.249Z")).is_ok());
    assert!(verify(&token, at("2025-08-30T09:41:36.250Z")).is_err());
}
