pub mod filename_metadata_inferrer;
pub mod in_memory_catalog_store;
pub mod json_catalog_store;
