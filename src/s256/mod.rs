//! secp256k1 specialisation: curve parameters, public points, ECDSA signatures
//! and private keys.
//!
//! Curve: `y² = x³ + 7` over `p = 2²⁵⁶ − 2³² − 977`, group order `n`.

use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::One;

use crate::ecc::{FieldElement, Point};

pub mod point;
pub mod private_key;
pub mod signature;

pub use point::S256Point;
pub use private_key::PrivateKey;
pub use signature::Signature;

const N_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

const GX_BYTES: [u8; 32] = [
    0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87, 0x0b, 0x07,
    0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98,
];

const GY_BYTES: [u8; 32] = [
    0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65, 0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11, 0x08, 0xa8,
    0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19, 0x9c, 0x47, 0xd0, 0x8f, 0xfb, 0x10, 0xd4, 0xb8,
];

/// Field prime `2²⁵⁶ − 2³² − 977`
pub static P: LazyLock<BigUint> =
    LazyLock::new(|| (BigUint::one() << 256u32) - (BigUint::one() << 32u32) - 977u32);

/// Group order
pub static N: LazyLock<BigUint> = LazyLock::new(|| BigUint::from_bytes_be(&N_BYTES));

/// `n / 2`; signatures with `s` above this are flipped to `n − s`
pub static HALF_N: LazyLock<BigUint> = LazyLock::new(|| &*N >> 1u32);

pub static A: LazyLock<FieldElement> = LazyLock::new(|| s256_field(BigUint::from(0u32)));
pub static B: LazyLock<FieldElement> = LazyLock::new(|| s256_field(BigUint::from(7u32)));

/// Generator point
pub static G: LazyLock<S256Point> = LazyLock::new(|| {
    S256Point::from_point(Point::new_unchecked(
        s256_field(BigUint::from_bytes_be(&GX_BYTES)),
        s256_field(BigUint::from_bytes_be(&GY_BYTES)),
        A.clone(),
        B.clone(),
    ))
});

/// Reduce `num` into the secp256k1 base field
pub(crate) fn s256_field(num: BigUint) -> FieldElement {
    FieldElement::reduced(num, &P)
}

/// `x⁻¹ mod n` via Fermat; `x` must be non-zero mod `n`
pub(crate) fn inv_mod_n(x: &BigUint) -> BigUint {
    x.modpow(&(&*N - 2u32), &N)
}

/// Big-endian 32-byte encoding, keeping the low 32 bytes of larger values
pub(crate) fn to_32_bytes(num: &BigUint) -> [u8; 32] {
    let bytes = num.to_bytes_be();
    let mut out = [0u8; 32];
    if bytes.len() >= 32 {
        out.copy_from_slice(&bytes[bytes.len() - 32..]);
    } else {
        out[32 - bytes.len()..].copy_from_slice(&bytes);
    }
    out
}
