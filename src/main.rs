use clap::Parser;
use shoplens::application::find_similar::{FindOptions, OutputField};
use shoplens::cli::commands::{Cli, Commands};
use shoplens::domain::ports::vector_store::InsertPolicy;
use shoplens::ShopLens;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; stdout carries exactly one JSON value.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let db_path = std::env::var("SHOPLENS_DB").unwrap_or_else(|_| "./shoplens.db".into());

    let policy = match &cli.command {
        Commands::Ingest { upsert: true, .. } => InsertPolicy::Upsert,
        _ => InsertPolicy::Reject,
    };

    let sl = match ShopLens::new(&db_path, policy) {
        Ok(sl) => sl,
        Err(e) => {
            eprintln!("Error initializing shoplens: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(sl, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(sl: ShopLens, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Ingest {
            manifest,
            images_dir,
            upsert: _,
        } => {
            let summary = sl.ingest(&manifest, &images_dir).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Find {
            image,
            limit,
            fields,
            include_id,
            ids_only,
            same_style,
        } => {
            let fields: Vec<OutputField> = fields
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse())
                .collect::<Result<_, String>>()?;
            let opts = FindOptions {
                limit,
                fields,
                include_id,
                ids_only,
                same_style,
            };
            let results = sl.find_similar(&image, &opts).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Remove { id } => {
            sl.remove(&id)?;
            println!("{}", serde_json::json!({ "removed": id }));
        }
        Commands::Clear => {
            let deleted = sl.clear()?;
            println!("{}", serde_json::json!({ "deleted": deleted }));
        }
        Commands::Stats => {
            let stats = sl.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
