// This file is part of FLOAT-CIRCUITS.
// SPDX-License-Identifier: Apache-2.0
// Licensed under the Apache License, Version 2.0 (the "License");
// You may not use this file except in compliance with the License.
// You may obtain a copy of the License at
// http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Off-circuit floating-point arithmetic, mirroring the in-circuit semantics
//! operation by operation. Useful to compute expected outputs and as a
//! reference for the circuit implementation.

use crate::float::{Float, FloatParams};

/// Returns `true` iff the given float is well-formed: a zero exponent forces
/// a zero mantissa, and a non-zero exponent must fit in `k` bits and come
/// with a normalized mantissa in `[2^p, 2^(p+1))`.
pub fn is_well_formed(params: &FloatParams, x: Float) -> bool {
    let k = params.exponent_bits();
    let p = params.mantissa_bits();
    if x.exponent == 0 {
        return x.mantissa == 0;
    }
    x.exponent < (1u64 << k) && (1u64 << p) <= x.mantissa && x.mantissa < (1u64 << (p + 1))
}

/// Adds two well-formed floats, producing a well-formed float. The result is
/// the exact sum rounded to the nearest representable value at scale `p`,
/// with ties rounded up.
///
/// # Panics
///
/// If either input is not well-formed.
pub fn add(params: &FloatParams, x: Float, y: Float) -> Float {
    assert!(is_well_formed(params, x), "malformed operand {x:?}");
    assert!(is_well_formed(params, y), "malformed operand {y:?}");

    let p = params.mantissa_bits();

    // Order the operands by the magnitude key e * 2^(p+1) + m. The key is
    // monotone in the represented value for well-formed inputs.
    let key = |f: Float| ((f.exponent as u128) << (p + 1)) | f.mantissa as u128;
    let (alpha, beta) = if key(x) >= key(y) { (x, y) } else { (y, x) };

    let diff = alpha.exponent - beta.exponent;
    if alpha.exponent == 0 || diff > (p as u64) + 1 {
        // Either both operands are zero, or the smaller one is entirely
        // absorbed by rounding at this precision.
        return alpha;
    }

    // Align the mantissas at scale p of the smaller exponent and add them.
    // The sum occupies at most 2p + 2 bits.
    let sum = ((alpha.mantissa as u128) << diff) + beta.mantissa as u128;

    // Normalize to scale P = 2p + 1.
    let ell = 127 - sum.leading_zeros();
    let m_norm = sum << (params.sum_msb() - ell);
    let e_norm = beta.exponent + ell as u64 - p as u64;

    round(params, e_norm, m_norm)
}

// Rounds a normalized mantissa at scale P = 2p + 1 back to scale p, bumping
// the exponent when the rounded mantissa overflows p + 1 bits.
fn round(params: &FloatParams, exponent: u64, mantissa: u128) -> Float {
    let p = params.mantissa_bits();
    let r = params.round_shift();
    let big_p = params.sum_msb();

    // Rounding overflows exactly when m + 2^(r-1) reaches 2^(P+1).
    if mantissa >= (1u128 << (big_p + 1)) - (1u128 << (r - 1)) {
        Float {
            exponent: exponent + 1,
            mantissa: 1u64 << p,
        }
    } else {
        Float {
            exponent,
            mantissa: ((mantissa + (1u128 << (r - 1))) >> r) as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FloatParams {
        FloatParams::new(8, 3)
    }

    #[test]
    fn test_well_formedness() {
        let params = params();
        assert!(is_well_formed(&params, Float::zero()));
        assert!(is_well_formed(&params, Float::new(1, 8)));
        assert!(is_well_formed(&params, Float::new(255, 15)));
        // A zero exponent with a non-zero mantissa.
        assert!(!is_well_formed(&params, Float::new(0, 8)));
        // A mantissa below or above the normalized range.
        assert!(!is_well_formed(&params, Float::new(1, 7)));
        assert!(!is_well_formed(&params, Float::new(1, 16)));
        // An exponent out of range.
        assert!(!is_well_formed(&params, Float::new(256, 8)));
    }

    #[test]
    fn test_add_zero() {
        let params = params();
        let x = Float::new(5, 11);
        assert_eq!(add(&params, x, Float::zero()), x);
        assert_eq!(add(&params, Float::zero(), x), x);
        assert_eq!(add(&params, Float::zero(), Float::zero()), Float::zero());
    }

    #[test]
    fn test_add_equal_magnitudes() {
        let params = params();
        // 32 + 32 = 64.
        assert_eq!(
            add(&params, Float::new(5, 8), Float::new(5, 8)),
            Float::new(6, 8)
        );
    }

    #[test]
    fn test_add_absorbed_operand() {
        let params = params();
        // The exponent gap exceeds p + 1, the smaller operand is rounded away.
        let big = Float::new(10, 9);
        let small = Float::new(1, 9);
        assert_eq!(add(&params, big, small), big);
    }

    #[test]
    fn test_add_rounding_overflow() {
        let params = params();
        // 60 + 3.75 = 63.75, which rounds up to 64.
        assert_eq!(
            add(&params, Float::new(5, 15), Float::new(1, 15)),
            Float::new(6, 8)
        );
    }

    #[test]
    fn test_add_exact() {
        let params = params();
        // Adding zero through the general path, since the exponent gap is
        // within p + 1.
        assert_eq!(
            add(&params, Float::new(2, 9), Float::new(0, 0)),
            Float::new(2, 9)
        );
        // 12 + 3 = 15 exactly.
        assert_eq!(
            add(&params, Float::new(6, 12), Float::new(4, 12)),
            Float::new(6, 15)
        );
    }

    #[test]
    fn test_add_matches_f64() {
        // With an f64-shaped format and small inputs, the result is exact.
        let params = FloatParams::new(11, 52);
        let p = params.mantissa_bits() as u64;
        let x = Float::new(p, 1u64 << p);
        let y = Float::new(p, (1u64 << p) + 2);
        let z = add(&params, x, y);
        assert_eq!(z.to_f64(&params), x.to_f64(&params) + y.to_f64(&params));
    }
}
