/// Errors raised when a required oracle slot is missing from the env.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("inventory oracle not available")]
    InventoryNotAvailable,

    #[error("item oracle not available")]
    ItemsNotAvailable,

    #[error("world oracle not available")]
    WorldNotAvailable,
}
