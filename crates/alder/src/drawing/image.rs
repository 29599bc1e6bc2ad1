use std::io::Read;

use alder_geom::Size;

use crate::error::{Error, Result};

/// The resource loading boundary. The core never touches the filesystem
/// directly; callers supply a provider.
pub trait StreamProvider {
    /// Open a named resource for reading.
    fn open_read(&self, path: &str) -> std::io::Result<Box<dyn Read>>;

    /// Return true if the named resource exists.
    fn file_exists(&self, path: &str) -> bool;
}

/// An image referenced by a control or a state-object set.
///
/// The core carries only the metadata it needs for layout; decoding is a
/// backend concern.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Image dimensions in device-independent units.
    pub size: Size,
    /// Source path, when loaded through a [`StreamProvider`].
    pub source: Option<String>,
    /// Raw encoded bytes, for the backend to decode.
    data: Vec<u8>,
}

impl Image {
    /// Construct an image from raw encoded bytes.
    pub fn from_bytes(size: Size, data: Vec<u8>) -> Self {
        Self {
            size,
            source: None,
            data,
        }
    }

    /// Load an image resource, erroring if the resource does not exist.
    pub fn load(provider: &dyn StreamProvider, path: &str, size: Size) -> Result<Self> {
        if !provider.file_exists(path) {
            return Err(Error::Resource(path.into()));
        }
        let mut data = Vec::new();
        provider.open_read(path)?.read_to_end(&mut data)?;
        Ok(Self {
            size,
            source: Some(path.into()),
            data,
        })
    }

    /// Load an image resource, returning `None` if it does not exist or
    /// cannot be read.
    pub fn load_or_none(provider: &dyn StreamProvider, path: &str, size: Size) -> Option<Self> {
        Self::load(provider, path, size).ok()
    }

    /// The raw encoded bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
