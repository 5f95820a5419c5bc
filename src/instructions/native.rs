//! Native instructions interface.

use ff::PrimeField;

use crate::{
    instructions::{
        AssertionInstructions, AssignmentInstructions, BinaryInstructions,
        ComparisonInstructions, ControlFlowInstructions, ConversionInstructions,
        DecompositionInstructions, EqualityInstructions, UnsafeConversionInstructions,
        ZeroInstructions,
    },
    types::{AssignedBit, AssignedNative},
};

/// The set of all native circuit instructions.
pub trait NativeInstructions<F>:
    BinaryInstructions<F>
    + AssignmentInstructions<F, AssignedBit<F>>
    + AssertionInstructions<F, AssignedBit<F>>
    + EqualityInstructions<F, AssignedBit<F>>
    + ControlFlowInstructions<F, AssignedBit<F>>
    + ZeroInstructions<F, AssignedNative<F>>
    + ControlFlowInstructions<F, AssignedNative<F>>
    + DecompositionInstructions<F, AssignedNative<F>>
    + ComparisonInstructions<F, AssignedNative<F>>
    + ConversionInstructions<F, AssignedBit<F>, AssignedNative<F>>
    + UnsafeConversionInstructions<F, AssignedNative<F>, AssignedBit<F>>
where
    F: PrimeField,
{
}
