mod error;
mod filesystem;
mod permissions;
mod services;

use clap::{Parser, Subcommand};
use error::AppError;
use photo_store::{
    ExternalPhotoStore, FsMediaCatalog, InternalPhotoStore, MediaCatalog, Photo, PhotoStoreConfig,
};
use services::capture_service::PhotoCaptureCoordinator;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "photo-vault")]
#[command(about = "Capture photos into private or shared media storage")]
struct Cli {
    /// Override the private photo directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the shared pictures directory
    #[arg(long)]
    pictures_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save a captured image into private or shared storage
    Capture {
        /// Image file standing in for the camera capture
        input: PathBuf,

        /// Filename without extension; a random UUID when omitted
        #[arg(long)]
        name: Option<String>,

        /// Save to the app-private directory instead of the shared catalog
        #[arg(long)]
        private: bool,
    },
    /// List photos in the private directory
    List,
    /// Delete a photo from the private directory by filename
    Delete { filename: String },
}

fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag("photo-vault"),
    );

    #[cfg(not(target_os = "android"))]
    env_logger::init();
}

fn print_listing(photos: &[Photo]) {
    println!("{} private photo(s)", photos.len());
    for photo in photos {
        println!(
            "  {} ({}x{})",
            photo.name,
            photo.pixels.width(),
            photo.pixels.height()
        );
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let data_dir = cli.data_dir.unwrap_or_else(filesystem::private_photos_dir);
    let pictures_dir = cli
        .pictures_dir
        .unwrap_or_else(filesystem::shared_pictures_dir);

    let config = PhotoStoreConfig {
        storage_path: data_dir.to_string_lossy().to_string(),
        ..Default::default()
    };
    let internal = Arc::new(InternalPhotoStore::new(config.clone()));
    let catalog: Arc<dyn MediaCatalog> = Arc::new(FsMediaCatalog::new(pictures_dir));
    let external = Arc::new(ExternalPhotoStore::new(catalog, &config));
    let coordinator = PhotoCaptureCoordinator::new(internal, external);

    match cli.command {
        Command::Capture {
            input,
            name,
            private,
        } => {
            let mut perms = permissions::query_permissions();
            if !private && !perms.write_granted {
                perms = permissions::request_write_permission().await;
            }

            let image = image::open(&input).map_err(|e| {
                AppError::ImageProcessing(format!("Failed to load capture {:?}: {}", input, e))
            })?;
            let name = name.unwrap_or_else(|| Uuid::new_v4().to_string());

            let outcome = coordinator
                .handle_capture(&name, image, private, perms)
                .await;
            if let Some(photos) = &outcome.photos {
                print_listing(photos);
            }
            if outcome.saved {
                println!("Photo saved successfully");
                Ok(())
            } else {
                Err(AppError::Other("Fail to save photo".to_string()))
            }
        }
        Command::List => {
            let photos = coordinator.private_photos().await?;
            print_listing(&photos);
            Ok(())
        }
        Command::Delete { filename } => {
            let outcome = coordinator.handle_delete(&filename).await;
            if outcome.deleted {
                println!("Photo delete successfully");
                if let Some(photos) = &outcome.photos {
                    print_listing(photos);
                }
                Ok(())
            } else {
                Err(AppError::Other("Fail to delete photo".to_string()))
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
