use crate::catalog::domain::watch::Watch;

/// Domain interface for catalog persistence.
///
/// The single contract the surrounding CRUD layer exposes: persist a
/// record and return it with an assigned identifier.
pub trait CatalogStore: Send {
    fn save(&self, watch: Watch) -> Result<Watch, Box<dyn std::error::Error>>;
}
