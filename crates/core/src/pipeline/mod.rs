pub mod ingest_images_use_case;
