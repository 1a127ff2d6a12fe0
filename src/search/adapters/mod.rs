mod collection;
mod granule;

pub use collection::CollectionRequest;
pub use granule::GranuleRequest;
