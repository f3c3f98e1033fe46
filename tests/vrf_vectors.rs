//! ECVRF proof vector bundles, for both challenge transcripts.

mod common;

use common::load_bundle;
use serde::Deserialize;

use ecvrf_dalek::vrf;

#[derive(Deserialize)]
struct VrfBundle {
    vectors: Vec<VrfVector>,
}

#[derive(Deserialize)]
struct VrfVector {
    sk: String,
    pk: String,
    alpha: String,
    pi: String,
    beta: String,
}

struct Mode {
    prove: fn(&[u8; vrf::SECRET_KEY_SIZE], &[u8]) -> [u8; vrf::PROOF_SIZE],
    verify: fn(&[u8; 32], &[u8], &[u8]) -> Result<[u8; vrf::OUTPUT_SIZE], ecvrf_dalek::Error>,
}

fn check_bundle(file: &str, mode: Mode) {
    let bundle: VrfBundle = load_bundle(file);
    assert!(!bundle.vectors.is_empty());

    for vector in &bundle.vectors {
        let seed: [u8; 32] = hex::decode(&vector.sk).unwrap().try_into().unwrap();
        let pk: [u8; 32] = hex::decode(&vector.pk).unwrap().try_into().unwrap();
        let alpha = hex::decode(&vector.alpha).unwrap();

        let mut secret_key = [0u8; vrf::SECRET_KEY_SIZE];
        secret_key[..32].copy_from_slice(&seed);
        secret_key[32..].copy_from_slice(&pk);

        let pi = (mode.prove)(&secret_key, &alpha);
        assert_eq!(hex::encode(pi), vector.pi, "{file}: alpha {}", vector.alpha);

        let beta = (mode.verify)(&pk, &pi, &alpha).expect("proof should verify");
        assert_eq!(hex::encode(beta), vector.beta, "{file}: alpha {}", vector.alpha);
        assert_eq!(beta, vrf::proof_to_hash(&pi).unwrap());

        let mut bad_pi = pi;
        bad_pi[0] ^= 0xa5;
        assert!(
            (mode.verify)(&pk, &bad_pi, &alpha).is_err(),
            "{file}: corrupted proof accepted for alpha {}",
            vector.alpha,
        );
    }
}

#[test]
fn ecvrf_edwards25519_sha512_ell2_vectors() {
    check_bundle(
        "ecvrf_edwards25519_sha512_ell2.json.gz",
        Mode {
            prove: vrf::prove,
            verify: vrf::verify,
        },
    );
}

#[test]
fn ecvrf_edwards25519_sha512_ell2_v10_vectors() {
    check_bundle(
        "ecvrf_edwards25519_sha512_ell2_v10.json.gz",
        Mode {
            prove: vrf::prove_v10,
            verify: vrf::verify_v10,
        },
    );
}

/// Proofs from either transcript must not verify under the other.
#[test]
fn challenge_modes_are_domain_separated() {
    let bundle: VrfBundle = load_bundle("ecvrf_edwards25519_sha512_ell2.json.gz");
    let vector = &bundle.vectors[0];

    let seed: [u8; 32] = hex::decode(&vector.sk).unwrap().try_into().unwrap();
    let pk: [u8; 32] = hex::decode(&vector.pk).unwrap().try_into().unwrap();
    let mut secret_key = [0u8; vrf::SECRET_KEY_SIZE];
    secret_key[..32].copy_from_slice(&seed);
    secret_key[32..].copy_from_slice(&pk);

    let pi = vrf::prove(&secret_key, b"alpha");
    let pi_v10 = vrf::prove_v10(&secret_key, b"alpha");
    assert_ne!(pi, pi_v10);
    assert!(vrf::verify_v10(&pk, &pi, b"alpha").is_err());
    assert!(vrf::verify(&pk, &pi_v10, b"alpha").is_err());
}
