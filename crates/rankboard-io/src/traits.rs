use rankboard_common::Dataset;

use crate::error::IoError;

/// Something that can produce a full [`Dataset`] on demand.
///
/// Sources are cheap descriptions (a path, a URL, a seed); the actual read
/// happens in [`DataSource::load`]. The `id` is the cache key, so two
/// sources with the same id must load the same data.
pub trait DataSource {
    fn id(&self) -> String;

    fn load(&self) -> Result<Dataset, IoError>;
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn id(&self) -> String {
        (**self).id()
    }

    fn load(&self) -> Result<Dataset, IoError> {
        (**self).load()
    }
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn id(&self) -> String {
        (**self).id()
    }

    fn load(&self) -> Result<Dataset, IoError> {
        (**self).load()
    }
}
