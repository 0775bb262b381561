use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shoplens", about = "Visual product similarity search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embed every product image in a manifest and store the vectors
    Ingest {
        /// JSON manifest: an array of {title, image, price, link, style}
        manifest: PathBuf,
        /// Directory holding the product images named by the manifest
        #[arg(long, default_value = ".")]
        images_dir: PathBuf,
        /// Overwrite records with colliding ids instead of failing
        #[arg(long)]
        upsert: bool,
    },
    /// Rank stored products by visual similarity to a query image
    Find {
        /// Path to the query image
        image: PathBuf,
        /// Number of results to return
        #[arg(long, default_value = "5")]
        limit: usize,
        /// Comma-separated metadata fields to emit (title,price,image,link,style)
        #[arg(long, default_value = "title,price,image,link")]
        fields: String,
        /// Include each record's id in the output objects
        #[arg(long)]
        include_id: bool,
        /// Emit only record ids, one JSON array of strings
        #[arg(long)]
        ids_only: bool,
        /// Keep only results sharing the best match's style
        #[arg(long)]
        same_style: bool,
    },
    /// Delete one record by id
    Remove {
        /// Record id
        id: String,
    },
    /// Delete every stored record
    Clear,
    /// Show record count and vector dimensionality
    Stats,
}
