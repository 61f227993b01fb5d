//! Operators: pure transformations from one observable into another.
//!
//! Every operator follows the same shape: an `XxxOp` observable that holds
//! the upstream source and the operator's parameters, and an `XxxObserver`
//! that subscribes upstream, applies the transformation, and re-emits to
//! its downstream observer. Terminal notifications pass through unchanged
//! unless the operator's contract says otherwise, and an operator that
//! finishes early (`take`, `catch_error`) releases its upstream
//! subscription when it does.

pub mod catch_error;
pub mod combine_latest;
pub mod distinct;
pub mod filter;
pub mod into_stream;
pub mod map;
pub mod merge;
pub mod retry;
pub mod scan;
pub mod skip;
pub mod start_with;
pub mod take;
