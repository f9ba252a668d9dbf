//! Private keys, RFC 6979 deterministic nonces, ECDSA signing and WIF

use std::fmt;

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;

use super::{inv_mod_n, to_32_bytes, S256Point, Signature, G, HALF_N, N};
use crate::config::get_config;
use crate::constants::{WIF_COMPRESSED_SUFFIX, WIF_MAINNET_PREFIX, WIF_TESTNET_PREFIX};
use crate::crypto::{hash256, hmac_sha256};
use crate::error::{Result, SigScriptError};
use crate::serialization::base58::{decode_base58_check, encode_base58_check};
use crate::types::{Hash, Network};

/// A secret scalar in `[1, n)` together with its public point
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: BigUint,
    point: S256Point,
}

impl PrivateKey {
    pub fn new(secret: BigUint) -> Result<Self> {
        if secret.is_zero() || secret >= *N {
            return Err(SigScriptError::SecretOutOfRange);
        }
        let point = G.scalar_mul(&secret)?;
        Ok(Self { secret, point })
    }

    /// Big-endian secret bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(BigUint::from_bytes_be(bytes))
    }

    /// Brain-wallet style key: little-endian integer of `hash256(passphrase)`,
    /// reduced mod `n`.
    pub fn from_passphrase(passphrase: &[u8]) -> Result<Self> {
        let secret = BigUint::from_bytes_le(&hash256(passphrase)) % &*N;
        Self::new(secret)
    }

    pub fn secret(&self) -> &BigUint {
        &self.secret
    }

    pub fn point(&self) -> &S256Point {
        &self.point
    }

    /// First RFC 6979 nonce for message scalar `z`
    pub fn deterministic_k(&self, z: &BigUint) -> Result<BigUint> {
        NonceStream::new(&self.secret, z)?.next_nonce()
    }

    /// Sign `z`, returning a low-s signature.
    ///
    /// A nonce producing `r = 0` or `s = 0` is discarded and the RFC 6979 stream
    /// continued, so the result stays deterministic.
    pub fn sign(&self, z: &BigUint) -> Result<Signature> {
        let mut nonces = NonceStream::new(&self.secret, z)?;
        loop {
            let k = nonces.next_nonce()?;
            let r = match G.scalar_mul(&k)?.x() {
                Some(x) => x % &*N,
                None => BigUint::zero(),
            };
            if r.is_zero() {
                debug!("nonce produced r = 0, drawing the next one");
                continue;
            }
            let mut s = ((z + &r * &self.secret) * inv_mod_n(&k)) % &*N;
            if s.is_zero() {
                debug!("nonce produced s = 0, drawing the next one");
                continue;
            }
            if s > *HALF_N {
                s = &*N - s;
            }
            return Ok(Signature::new(r, s));
        }
    }

    /// Wallet Import Format
    pub fn wif(&self, compressed: bool, testnet: bool) -> String {
        let mut payload = Vec::with_capacity(34);
        payload.push(Network::from_testnet(testnet).wif_prefix());
        payload.extend_from_slice(&to_32_bytes(&self.secret));
        if compressed {
            payload.push(WIF_COMPRESSED_SUFFIX);
        }
        encode_base58_check(&payload)
    }

    /// WIF for the configured network and SEC form
    pub fn default_wif(&self) -> String {
        let config = get_config();
        self.wif(config.keys.compressed_sec, config.network.testnet)
    }

    /// Inverse of [`PrivateKey::wif`]: the key, its compression flag and network
    pub fn from_wif(wif: &str) -> Result<(Self, bool, Network)> {
        let payload = decode_base58_check(wif)?;
        let network = match payload.first() {
            Some(&WIF_MAINNET_PREFIX) => Network::Mainnet,
            Some(&WIF_TESTNET_PREFIX) => Network::Testnet,
            Some(other) => {
                return Err(SigScriptError::Base58(
                    format!("unknown WIF version byte 0x{other:02x}").into(),
                ))
            }
            None => return Err(SigScriptError::Base58("empty WIF payload".into())),
        };
        let compressed = match payload.len() {
            33 => false,
            34 if payload[33] == WIF_COMPRESSED_SUFFIX => true,
            len => {
                return Err(SigScriptError::Base58(
                    format!("bad WIF payload length {len}").into(),
                ))
            }
        };
        let key = Self::from_bytes(&payload[1..33])?;
        Ok((key, compressed, network))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("secret", &"<redacted>")
            .field("point", &self.point)
            .finish()
    }
}

/// HMAC-SHA256 DRBG state from RFC 6979 section 3.2
struct NonceStream {
    k: Hash,
    v: Hash,
    drawn: bool,
}

impl NonceStream {
    fn new(secret: &BigUint, z: &BigUint) -> Result<Self> {
        let z = z % &*N;
        let z_bytes = to_32_bytes(&z);
        let secret_bytes = to_32_bytes(secret);

        let mut k = [0u8; 32];
        let mut v = [1u8; 32];
        k = hmac_sha256(&k, &[&v, &[0x00], &secret_bytes, &z_bytes])?;
        v = hmac_sha256(&k, &[&v])?;
        k = hmac_sha256(&k, &[&v, &[0x01], &secret_bytes, &z_bytes])?;
        v = hmac_sha256(&k, &[&v])?;
        Ok(Self { k, v, drawn: false })
    }

    /// Next candidate in `[1, n)`
    fn next_nonce(&mut self) -> Result<BigUint> {
        loop {
            if self.drawn {
                self.k = hmac_sha256(&self.k, &[&self.v, &[0x00]])?;
                self.v = hmac_sha256(&self.k, &[&self.v])?;
            }
            self.drawn = true;
            self.v = hmac_sha256(&self.k, &[&self.v])?;
            let candidate = BigUint::from_bytes_be(&self.v);
            if !candidate.is_zero() && candidate < *N {
                return Ok(candidate);
            }
            debug!("nonce candidate outside [1, n), reseeding");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(hex_str: &str) -> BigUint {
        BigUint::parse_bytes(hex_str.as_bytes(), 16).unwrap()
    }

    #[test]
    fn test_secret_range() {
        assert_eq!(
            PrivateKey::from_bytes(&[0u8; 32]),
            Err(SigScriptError::SecretOutOfRange)
        );
        assert_eq!(
            PrivateKey::new(N.clone()),
            Err(SigScriptError::SecretOutOfRange)
        );
        assert!(PrivateKey::new(&*N - 1u32).is_ok());
        assert_eq!(PrivateKey::new(BigUint::from(1u32)).unwrap().point(), &*G);
    }

    #[test]
    fn test_sign_is_deterministic_and_low_s() {
        let key = PrivateKey::new(BigUint::from(12345u32)).unwrap();
        let z = big("bc62d4b80d9e36da29c16c5d4d9f11731f36052c72401a76c23c0fb5a9b74423");
        let a = key.sign(&z).unwrap();
        let b = key.sign(&z).unwrap();
        assert_eq!(a, b);
        assert!(a.s() <= &*HALF_N);
        assert!(key.point().verify(&z, &a).unwrap());
        assert!(!key.point().verify(&(&z + 1u32), &a).unwrap());
    }

    #[test]
    fn test_sign_fails_under_other_key() {
        let key = PrivateKey::new(BigUint::from(8675309u32)).unwrap();
        let other = PrivateKey::new(BigUint::from(8675310u32)).unwrap();
        let z = BigUint::from(0xdeadbeefu32);
        let sig = key.sign(&z).unwrap();
        assert!(!other.point().verify(&z, &sig).unwrap());
    }

    #[test]
    fn test_deterministic_k_stable() {
        let key = PrivateKey::new(BigUint::from(1u32)).unwrap();
        let z = BigUint::from(42u32);
        let k1 = key.deterministic_k(&z).unwrap();
        let k2 = key.deterministic_k(&z).unwrap();
        assert_eq!(k1, k2);
        assert!(!k1.is_zero() && k1 < *N);
        assert_ne!(k1, key.deterministic_k(&BigUint::from(43u32)).unwrap());
    }

    #[test]
    fn test_deterministic_k_reduces_z_mod_n() {
        let key = PrivateKey::new(BigUint::from(3u32)).unwrap();
        assert_eq!(
            key.deterministic_k(&N).unwrap(),
            key.deterministic_k(&BigUint::zero()).unwrap()
        );
        let z = BigUint::from(12345u32);
        assert_eq!(
            key.deterministic_k(&(&*N + &z)).unwrap(),
            key.deterministic_k(&z).unwrap()
        );
        assert_eq!(
            key.deterministic_k(&(&*N * 2u32 + &z)).unwrap(),
            key.deterministic_k(&z).unwrap()
        );
    }

    #[test]
    fn test_nonce_stream_continues() {
        let mut stream = NonceStream::new(&BigUint::from(7u32), &BigUint::from(9u32)).unwrap();
        let first = stream.next_nonce().unwrap();
        let second = stream.next_nonce().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_wif_vectors() {
        let cases = [
            (
                BigUint::from(5003u32),
                true,
                true,
                "cMahea7zqjxrtgAbB7LSGbcQUr1uX1ojuat9jZodMN8rFTv2sfUK",
            ),
            (
                BigUint::from(2021u32).pow(5),
                false,
                true,
                "91avARGdfge8E4tZfYLoxeJ5sGBdNJQH4kvjpWAxgzczjbCwxic",
            ),
            (
                big("54321deadbeef"),
                true,
                false,
                "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgiuQJv1h8Ytr2S53a",
            ),
        ];
        for (secret, compressed, testnet, expected) in cases {
            let key = PrivateKey::new(secret).unwrap();
            assert_eq!(key.wif(compressed, testnet), expected);
            let (decoded, c, network) = PrivateKey::from_wif(expected).unwrap();
            assert_eq!(decoded, key);
            assert_eq!(c, compressed);
            assert_eq!(network, Network::from_testnet(testnet));
        }
    }

    #[test]
    fn test_from_wif_rejects_address() {
        assert!(matches!(
            PrivateKey::from_wif("1BenRpVUFK65JFWcQSuHnJKzc4M8ZP8Eqa"),
            Err(SigScriptError::Base58(_))
        ));
    }

    #[test]
    fn test_default_wif_follows_config() {
        let key = PrivateKey::new(BigUint::from(5003u32)).unwrap();
        let config = get_config();
        assert_eq!(
            key.default_wif(),
            key.wif(config.keys.compressed_sec, config.network.testnet)
        );
        assert_eq!(
            key.point().default_address().unwrap(),
            key.point()
                .address(config.keys.compressed_sec, config.network.testnet)
                .unwrap()
        );
    }

    #[test]
    fn test_from_passphrase() {
        let key = PrivateKey::from_passphrase(b"example passphrase").unwrap();
        let expected = BigUint::from_bytes_le(&hash256(b"example passphrase")) % &*N;
        assert_eq!(key.secret(), &expected);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = PrivateKey::new(BigUint::from(0x1234_5678u32)).unwrap();
        let dbg = format!("{key:?}");
        assert!(dbg.contains("<redacted>"));
        assert!(!dbg.contains("305419896"));
    }
}
