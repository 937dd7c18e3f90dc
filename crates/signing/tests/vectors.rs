use optikpi_signing::{
    AuthContext, CanonicalPayload, ConfigurationError, HashAlgorithm, KeyDeriver, RequestSigner,
    SIGNING_INFO, SignatureVerifier, derive_key, sign, verify,
};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

const TOKEN: &str = "test-token";
const ACCOUNT: &str = "test-account";
const WORKSPACE: &str = "test-workspace";

// Captured from the reference implementation shared by the other SDKs.
const KEY_SHA256: &str = "e9212a88410bd6708d20c8ef365a07c038e12e2102166d1c60e9f1e47806d718";
const KEY_SHA256_64: &str = "e9212a88410bd6708d20c8ef365a07c038e12e2102166d1c60e9f1e47806d718\
                             dcd4ed6241c0b184086db80ca19d5533d7993d403485493337b3d9ade1016418";
const KEY_SHA512_64: &str = "0101d2c5d9e49f1995eb42b70fdcbafa347694e046aa28cb07d1db79d03289fc\
                             39e465d7d3970ad6bd69a15a42e7b8e3ce4b4b4bfeb2edd597b35e411820e70d";
const SIG_AB: &str = "f98e3b9a705a2732e6d67abc5fd925d71e3b8b67d95e31a14d25d21f4fc563a8";
const SIG_BA: &str = "5ef3ed27f6fe2a25a55f907cc8d66eb5cf2d597e144b9629f3c15a4fbcf318cb";
const SIG_AB_SHA384: &str = "3d80569c338588f996279d12532dec8717713f736e051e34e942d6df46bf89a2\
                             7765ffecd737b68be880541b827fd3d5";
const SIG_AB_SHA512: &str = "21b2cacfb16461d0a7596f20c185e6810c9e9a6c5de39a58134ed8443fe83f0f\
                             b713689f95b789995e7ab991b15cb774b659d3005799fca9cd6712ac7b179de4";
const SIG_UNICODE: &str = "9f7218e3cc78e503cbde6c487e93f604e161c1c2acb355b3d7747f6c9395feab";
// First block of RFC 5869 HKDF with the salt as the extract key.
const TEXTBOOK_HKDF: &str = "58612ef985fd0763ffc819bb4806373039261b83b616fec90955b5a52c20bca6";

fn context() -> AuthContext {
    AuthContext::new(TOKEN, ACCOUNT, WORKSPACE).unwrap()
}

// ── Pinned vectors ───────────────────────────────────────────────────

#[test]
fn derived_key_matches_fixture() {
    let key = derive_key(TOKEN, ACCOUNT, WORKSPACE, SIGNING_INFO, HashAlgorithm::Sha256, 32).unwrap();
    assert_eq!(key.to_hex(), KEY_SHA256);
}

#[test]
fn derived_key_is_not_textbook_hkdf() {
    let key = derive_key(TOKEN, ACCOUNT, WORKSPACE, SIGNING_INFO, HashAlgorithm::Sha256, 32).unwrap();
    assert_ne!(key.to_hex(), TEXTBOOK_HKDF);
}

#[test]
fn two_block_key_matches_fixture() {
    let key = derive_key(TOKEN, ACCOUNT, WORKSPACE, SIGNING_INFO, HashAlgorithm::Sha256, 64).unwrap();
    assert_eq!(key.to_hex(), KEY_SHA256_64);
}

#[test]
fn sha512_key_matches_fixture() {
    let key = derive_key(TOKEN, ACCOUNT, WORKSPACE, SIGNING_INFO, HashAlgorithm::Sha512, 64).unwrap();
    assert_eq!(key.to_hex(), KEY_SHA512_64);
}

#[test]
fn signature_matches_fixture() {
    let result = sign(&json!({"a": 1, "b": 2}), &context(), HashAlgorithm::Sha256).unwrap();
    assert_eq!(result.signature, SIG_AB);
    assert_eq!(result.algorithm.as_str(), "sha256");
}

#[test]
fn pre_serialized_body_matches_fixture() {
    let result = sign(r#"{"a":1,"b":2}"#, &context(), HashAlgorithm::Sha256).unwrap();
    assert_eq!(result.signature, SIG_AB);
}

#[test]
fn other_algorithms_match_fixtures() {
    let payload = json!({"a": 1, "b": 2});
    let sha384 = sign(&payload, &context(), HashAlgorithm::Sha384).unwrap();
    let sha512 = sign(&payload, &context(), HashAlgorithm::Sha512).unwrap();
    assert_eq!(sha384.signature, SIG_AB_SHA384);
    assert_eq!(sha512.signature, SIG_AB_SHA512);
}

#[test]
fn utf8_payload_matches_fixture() {
    let result = sign(&json!({"name": "Zoë", "amount": 10.5}), &context(), HashAlgorithm::Sha256)
        .unwrap();
    assert_eq!(result.signature, SIG_UNICODE);
}

// ── Canonicalization ─────────────────────────────────────────────────

#[test]
fn reordered_keys_change_signature() {
    let ab = sign(&json!({"a": 1, "b": 2}), &context(), HashAlgorithm::Sha256).unwrap();
    let ba = sign(&json!({"b": 2, "a": 1}), &context(), HashAlgorithm::Sha256).unwrap();
    assert_eq!(ab.signature, SIG_AB);
    assert_eq!(ba.signature, SIG_BA);
}

#[test]
fn whitespace_in_raw_body_changes_signature() {
    let compact = sign(r#"{"a":1,"b":2}"#, &context(), HashAlgorithm::Sha256).unwrap();
    let spaced = sign(r#"{"a": 1, "b": 2}"#, &context(), HashAlgorithm::Sha256).unwrap();
    assert_ne!(compact.signature, spaced.signature);
}

// ── Failure modes ────────────────────────────────────────────────────

#[test]
fn each_empty_derivation_input_is_rejected() {
    let cases = [
        (("", "a", "b", "info"), "auth_token"),
        (("t", "", "b", "info"), "account_id"),
        (("t", "a", "", "info"), "workspace_id"),
        (("t", "a", "b", ""), "info"),
    ];
    for ((token, account, workspace, info), field) in cases {
        let err = derive_key(token, account, workspace, info, HashAlgorithm::Sha256, 32).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingField(field));
    }
}

#[test]
fn unknown_algorithm_name_is_a_configuration_error() {
    let err = "whirlpool".parse::<HashAlgorithm>().unwrap_err();
    assert!(matches!(err, ConfigurationError::UnsupportedAlgorithm(name) if name == "whirlpool"));
}

#[test]
fn tampered_signature_is_false_not_error() {
    let payload = json!({"a": 1, "b": 2});
    let tampered = format!("{SIG_AB}0");
    assert!(!verify(&payload, &tampered, &context(), HashAlgorithm::Sha256).unwrap());
    assert!(verify(&payload, SIG_AB, &context(), HashAlgorithm::Sha256).unwrap());
}

// ── Concurrency ──────────────────────────────────────────────────────

#[test]
fn shared_signer_is_consistent_across_threads() {
    let signer = RequestSigner::new(context());
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let signer = &signer;
                scope.spawn(move || {
                    let own = signer.sign(&json!({"thread": i})).unwrap();
                    let fixed = signer.sign(&json!({"a": 1, "b": 2})).unwrap();
                    (own.signature.signature, fixed.signature.signature)
                })
            })
            .collect();
        for handle in handles {
            let (_, fixed) = handle.join().unwrap();
            assert_eq!(fixed, SIG_AB);
        }
    });
}

// ── Properties ───────────────────────────────────────────────────────

fn identity() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,24}"
}

fn json_payload() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[ -~]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn signing_is_deterministic(
        token in identity(),
        account in identity(),
        workspace in identity(),
        payload in json_payload()
    ) {
        let ctx = AuthContext::new(token, account, workspace).unwrap();
        let first = sign(&payload, &ctx, HashAlgorithm::Sha256).unwrap();
        let second = sign(&payload, &ctx, HashAlgorithm::Sha256).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn signatures_round_trip(
        token in identity(),
        account in identity(),
        workspace in identity(),
        payload in json_payload()
    ) {
        let ctx = AuthContext::new(token, account, workspace).unwrap();
        let signed = RequestSigner::new(ctx.clone()).sign(&payload).unwrap();
        let verifier = SignatureVerifier::new(ctx);
        prop_assert!(verifier.verify(&payload, &signed.signature.signature).unwrap());
        prop_assert!(verifier.verify_canonical(&signed.body, &signed.signature.signature).unwrap());
        let tampered = format!("{}0", signed.signature.signature);
        prop_assert!(!verifier.verify(&payload, &tampered).unwrap());
    }

    #[test]
    fn flipping_a_body_byte_changes_signature(body in "[ -~]{1,64}", index in any::<prop::sample::Index>()) {
        let signer = RequestSigner::new(context());
        let original = CanonicalPayload::raw(body.clone());
        let mut bytes = body.into_bytes();
        let i = index.index(bytes.len());
        bytes[i] ^= 0x01;
        let flipped = CanonicalPayload::from_bytes(bytes);
        prop_assert_ne!(
            signer.sign_canonical(&original).unwrap(),
            signer.sign_canonical(&flipped).unwrap()
        );
    }

    #[test]
    fn each_identity_field_changes_signature(suffix in "[a-z0-9]{1,8}") {
        let payload = json!({"a": 1, "b": 2});
        let variants = [
            AuthContext::new(format!("{TOKEN}{suffix}"), ACCOUNT, WORKSPACE).unwrap(),
            AuthContext::new(TOKEN, format!("{ACCOUNT}{suffix}"), WORKSPACE).unwrap(),
            AuthContext::new(TOKEN, ACCOUNT, format!("{WORKSPACE}{suffix}")).unwrap(),
        ];
        for ctx in &variants {
            let signature = sign(&payload, ctx, HashAlgorithm::Sha256).unwrap();
            prop_assert_ne!(signature.signature.as_str(), SIG_AB);
        }
    }

    #[test]
    fn derived_keys_are_prefix_stable(length in 1usize..=200) {
        let deriver = KeyDeriver::default().with_length(length).unwrap();
        let key = deriver.derive(TOKEN, ACCOUNT, WORKSPACE, SIGNING_INFO).unwrap();
        prop_assert_eq!(key.len(), length);
        let full = derive_key(TOKEN, ACCOUNT, WORKSPACE, SIGNING_INFO, HashAlgorithm::Sha256, 200).unwrap();
        prop_assert_eq!(key.as_bytes(), &full.as_bytes()[..length]);
    }
}
