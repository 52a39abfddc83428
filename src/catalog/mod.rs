//! Product catalog: literal and semantic lookups plus embedding persistence.

mod error;
pub mod model;
pub mod postgres;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::{CatalogError, CatalogResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCatalogStore, cosine_similarity};
pub use model::{CatalogProduct, MissingEmbedding, NewProduct, ScoredProduct};
pub use postgres::{PgCatalogStore, escape_like};
pub use store::{CatalogStore, SharedCatalog};
