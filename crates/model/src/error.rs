/// Error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(&'static str),
    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Overflow.
    #[error("overflow")]
    Overflow,
}
