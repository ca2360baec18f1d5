use crate::Result;

pub use prefetch_core::driver::{
    operation::{self, Operation},
    Driver, Response, Rows,
};

use url::Url;

/// Opens a driver for a connection URL.
///
/// Supported schemes depend on the enabled features.
pub fn connect(url: &str) -> Result<Box<dyn Driver>> {
    let parsed = Url::parse(url).map_err(anyhow::Error::from)?;

    match parsed.scheme() {
        "memory" => connect_memory(url),
        scheme => Err(anyhow::anyhow!("unsupported database; scheme={scheme}; url={url}").into()),
    }
}

#[cfg(feature = "memory")]
fn connect_memory(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(prefetch_driver_memory::Memory::new(url)?))
}

#[cfg(not(feature = "memory"))]
fn connect_memory(_url: &str) -> Result<Box<dyn Driver>> {
    Err(anyhow::anyhow!("`memory` feature not enabled").into())
}
