use cns_client::StoreError;
use config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

/// Engine error hierarchy.
///
/// Store transport failures keep their operation tag from
/// [`StoreError`]; configuration failures surface the `config` crate's
/// diagnostics unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
