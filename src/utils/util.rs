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

// TODO: We should add docs to all of these utilities.
#![allow(missing_docs)]

use ff::PrimeField;
use num_bigint::BigUint;
use num_traits::{Num, One, ToPrimitive};
#[cfg(any(test, feature = "testing"))]
use {
    halo2_proofs::circuit::Layouter,
    halo2_proofs::plonk::ConstraintSystem,
};

pub fn modulus<F: PrimeField>() -> BigUint {
    BigUint::from_str_radix(&F::MODULUS[2..], 16).unwrap()
}

pub fn big_to_fe<F: PrimeField>(e: BigUint) -> F {
    let modulus = modulus::<F>();
    let e = e % modulus;
    F::from_str_vartime(&e.to_str_radix(10)[..]).unwrap()
}

pub fn fe_to_big<F: PrimeField>(fe: F) -> BigUint {
    BigUint::from_bytes_le(fe.to_repr().as_ref())
}

/// The `u64` represented by the given field element.
///
/// # Panics
///
/// If the element does not fit in 64 bits.
pub fn fe_to_u64<F: PrimeField>(fe: F) -> u64 {
    fe_to_big(fe)
        .to_u64()
        .expect("field element does not fit in 64 bits")
}

/// The field element `2^n`.
///
/// # Panics
///
/// If `n >= F::NUM_BITS`.
pub fn pow2<F: PrimeField>(n: usize) -> F {
    assert!((n as u32) < F::NUM_BITS);
    big_to_fe(BigUint::one() << n)
}

/// Trait for chips and gadgets that can be tested independently, with a
/// full control of their configuration.
#[cfg(any(test, feature = "testing"))]
pub trait FromScratch<F: PrimeField> {
    type Config: Clone + std::fmt::Debug;

    fn new_from_scratch(config: &Self::Config) -> Self;

    fn configure_from_scratch(meta: &mut ConstraintSystem<F>) -> Self::Config;

    fn load_from_scratch(layouter: &mut impl Layouter<F>, config: &Self::Config);
}

#[cfg(test)]
mod tests {
    use halo2_proofs::pasta::Fp;

    use super::*;

    #[test]
    fn test_big_fe_round_trip() {
        for v in [0u64, 1, 2, 255, 1 << 32, u64::MAX] {
            let big = BigUint::from(v);
            assert_eq!(fe_to_big(big_to_fe::<Fp>(big.clone())), big);
        }
    }

    #[test]
    fn test_pow2() {
        assert_eq!(pow2::<Fp>(0), Fp::from(1));
        assert_eq!(pow2::<Fp>(10), Fp::from(1024));
        assert_eq!(pow2::<Fp>(64), big_to_fe(BigUint::one() << 64));
    }
}
