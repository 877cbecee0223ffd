use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use watchcase_core::catalog::infrastructure::filename_metadata_inferrer::FilenameMetadataInferrer;
use watchcase_core::catalog::infrastructure::json_catalog_store::JsonCatalogStore;
use watchcase_core::clustering::domain::clusterer::Clusterer;
use watchcase_core::clustering::infrastructure::dbscan_clusterer::{
    DbscanClusterer, DEFAULT_EPS, DEFAULT_MIN_PTS,
};
use watchcase_core::features::infrastructure::batch_extractor::extract_batch;
use watchcase_core::features::infrastructure::histogram_extractor::HistogramExtractor;
use watchcase_core::pipeline::ingest_images_use_case::IngestImagesUseCase;
use watchcase_core::shared::constants::IMAGE_EXTENSIONS;
use watchcase_core::storage::domain::image_store::UploadedImage;
use watchcase_core::storage::infrastructure::local_image_store::LocalImageStore;

/// Group watch photos by visual similarity and catalog them.
#[derive(Parser)]
#[command(name = "watchcase")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a batch of photos, group them and create catalog records.
    Ingest {
        /// Image files or directories to ingest.
        inputs: Vec<PathBuf>,

        /// Directory uploaded images are stored in.
        #[arg(long, default_value = "uploads")]
        uploads_dir: PathBuf,

        /// Catalog JSON file records are appended to.
        #[arg(long, default_value = "catalog.json")]
        catalog: PathBuf,

        /// Maximum histogram distance between grouped images.
        #[arg(long, default_value_t = DEFAULT_EPS)]
        eps: f32,

        /// Minimum neighbors (self included) to seed a group.
        #[arg(long, default_value_t = DEFAULT_MIN_PTS)]
        min_samples: usize,
    },
    /// Group photos without storing anything; print the file → cluster id
    /// mapping as JSON.
    Cluster {
        /// Image files to cluster.
        images: Vec<PathBuf>,

        /// Maximum histogram distance between grouped images.
        #[arg(long, default_value_t = DEFAULT_EPS)]
        eps: f32,

        /// Minimum neighbors (self included) to seed a group.
        #[arg(long, default_value_t = DEFAULT_MIN_PTS)]
        min_samples: usize,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Ingest {
            inputs,
            uploads_dir,
            catalog,
            eps,
            min_samples,
        } => run_ingest(&inputs, &uploads_dir, &catalog, eps, min_samples),
        Command::Cluster {
            images,
            eps,
            min_samples,
        } => run_cluster(&images, eps, min_samples),
    }
}

fn run_ingest(
    inputs: &[PathBuf],
    uploads_dir: &Path,
    catalog: &Path,
    eps: f32,
    min_samples: usize,
) -> Result<(), Box<dyn Error>> {
    let files = collect_image_files(inputs)?;
    if files.is_empty() {
        log::warn!("no image files to ingest");
        println!("[]");
        return Ok(());
    }

    let mut uploads = Vec::with_capacity(files.len());
    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        uploads.push(UploadedImage::new(file_name, fs::read(path)?));
    }

    let use_case = IngestImagesUseCase::new(
        Box::new(LocalImageStore::new(uploads_dir)),
        Box::new(HistogramExtractor::new()),
        Box::new(DbscanClusterer::new(eps, min_samples)),
        Box::new(FilenameMetadataInferrer::new()),
        Box::new(JsonCatalogStore::new(catalog)),
    );
    let created = use_case.execute(uploads)?;

    log::info!("created {} watch records", created.len());
    println!("{}", serde_json::to_string_pretty(&created)?);
    Ok(())
}

fn run_cluster(images: &[PathBuf], eps: f32, min_samples: usize) -> Result<(), Box<dyn Error>> {
    let mut batch = Vec::with_capacity(images.len());
    for path in images {
        batch.push((path.clone(), fs::read(path)?));
    }

    let extractor = HistogramExtractor::new();
    let features = extract_batch(&extractor, &batch);
    let assignments = DbscanClusterer::new(eps, min_samples).cluster(&features)?;

    // Stable key order for scripted consumers.
    let ordered: BTreeMap<String, i32> = assignments
        .into_iter()
        .map(|(path, id)| (path.display().to_string(), id))
        .collect();
    println!("{}", serde_json::to_string(&ordered)?);
    Ok(())
}

/// Expands directory arguments into their image files (sorted, one level
/// deep); plain file arguments are taken as-is.
fn collect_image_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(input)?
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect();
            entries.sort();
            for path in entries {
                if is_image(&path) {
                    files.push(path);
                } else {
                    log::info!("skipping non-image file {}", path.display());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
