#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server binary for the building energy benchmarking map.
//!
//! Fetches the full dataset from the NYC Open Data API at startup (or
//! reuses a snapshot file), then serves the map API and static frontend.
//!
//! The frontend build is served from `app/dist` by default; point
//! `STATIC_DIR` elsewhere when the build lives somewhere else.

use std::path::PathBuf;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use benchmap_server::{AppState, handlers};
use benchmap_source::socrata::{SocrataClient, ingest_all};
use benchmap_source::{IngestResult, load_snapshot, save_snapshot};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "benchmap_server")]
struct Args {
    /// Dataset snapshot file. Loaded instead of hitting the API when it
    /// exists; written after a successful fetch otherwise.
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Fetch the dataset, write the snapshot, and exit without serving.
    #[arg(long)]
    fetch_only: bool,
}

/// Resolves the frontend directory from the `STATIC_DIR` environment
/// variable, defaulting to the standard frontend build output.
fn static_dir(var: Option<String>) -> String {
    var.filter(|dir| !dir.trim().is_empty())
        .unwrap_or_else(|| "app/dist".to_owned())
}

async fn load_dataset(args: &Args) -> Result<IngestResult, benchmap_source::SourceError> {
    if let Some(path) = &args.data_file
        && path.exists()
        && !args.fetch_only
    {
        log::info!("Loading dataset snapshot from {}", path.display());
        return load_snapshot(path);
    }

    let client = SocrataClient::new();
    let result = ingest_all(&client).await?;

    if let Some(path) = &args.data_file {
        log::info!("Writing dataset snapshot to {}", path.display());
        save_snapshot(path, &result)?;
    }

    Ok(result)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let args = Args::parse();

    let ingest = match load_dataset(&args).await {
        Ok(ingest) => ingest,
        Err(err) => {
            log::error!("Failed to load data from NYC Open Data API: {err}");
            return Err(std::io::Error::other(err.to_string()));
        }
    };

    if args.fetch_only {
        log::info!("Fetched {} buildings, exiting", ingest.buildings.len());
        return Ok(());
    }

    let Some(state) = AppState::from_ingest(ingest) else {
        log::error!(
            "No building data was returned: the API responded but no valid \
             buildings with coordinates were found"
        );
        return Err(std::io::Error::other("empty dataset"));
    };

    log::info!(
        "Serving {} buildings across {} reporting years ({} rows excluded)",
        state.buildings.len(),
        state.years.len(),
        state.excluded_count
    );

    let state = web::Data::new(state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let frontend_dir = static_dir(std::env::var("STATIC_DIR").ok());

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/meta", web::get().to(handlers::meta))
                    .route("/buildings", web::get().to(handlers::buildings))
                    .route("/stats", web::get().to(handlers::summary))
                    .route("/export.csv", web::get().to(handlers::export)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", frontend_dir.as_str()).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::static_dir;

    #[test]
    fn static_dir_defaults_to_the_frontend_build() {
        assert_eq!(static_dir(None), "app/dist");
        assert_eq!(static_dir(Some("  ".to_owned())), "app/dist");
    }

    #[test]
    fn static_dir_honors_an_override() {
        assert_eq!(static_dir(Some("public".to_owned())), "public");
    }
}
