use thiserror::Error;

/// Error taxonomy for streams that want a concrete error type.
///
/// The engine itself stays generic over `Err`; this enum is what
/// applications and tests reach for when they have nothing more specific.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StreamError {
  /// A producer routine failed while generating values.
  #[error("producer failed: {0}")]
  Producer(String),
  /// A transformation stage failed while processing a value.
  #[error("operator failed: {0}")]
  Operator(String),
  /// A notification was pushed where the stream contract forbids it.
  #[error("notification pushed after the stream terminated")]
  ProtocolViolation,
}
