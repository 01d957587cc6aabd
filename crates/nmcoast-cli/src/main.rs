use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use nmcoast_api::CountsClient;
use nmcoast_core::CounterStore;
use nmcoast_viewer::export::{self, ExportFormat};
use nmcoast_viewer::ExportFile;

#[derive(Debug, Parser)]
#[command(name = "nmcoast-cli")]
#[command(about = "NM COAST counter map command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List all counters known to the counts API.
    Counters,
    /// Download counter metadata as a dated JSON or CSV file.
    ExportMetadata {
        /// Output format: json or csv.
        #[arg(long, default_value = "csv")]
        format: String,
        /// Directory the artifact is written into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Download one counter's raw data bundle as a ZIP archive.
    ExportRaw {
        #[arg(long)]
        counter_id: i64,
        /// Directory the artifact is written into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = nmcoast_core::load_app_config_from_env()?;
    let client = CountsClient::new(&config.api_base_url, config.request_timeout_secs)?;

    match cli.command {
        Commands::Counters => {
            let counters = client.list_counters().await?;
            println!("{} counters", counters.len());
            for c in &counters {
                println!(
                    "{:>6}  {:<40}  {:<12}  {:.5}, {:.5}",
                    c.counter_id, c.counter_name, c.vendor, c.latitude, c.longitude
                );
            }
        }
        Commands::ExportMetadata { format, out_dir } => {
            let Some(format) = ExportFormat::parse(&format) else {
                anyhow::bail!("unknown export format: {format} (expected json or csv)");
            };
            let counters = client.list_counters().await?;
            let store = CounterStore::new(counters);
            let file =
                export::metadata_export(&store, format, chrono::Utc::now().date_naive())?;
            let path = write_artifact(&out_dir, &file)?;
            println!("wrote {}", path.display());
        }
        Commands::ExportRaw {
            counter_id,
            out_dir,
        } => {
            let file = export::raw_data_archive(
                &client,
                counter_id,
                config.max_concurrent_count_fetches,
            )
            .await?;
            let path = write_artifact(&out_dir, &file)?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}

fn write_artifact(out_dir: &Path, file: &ExportFile) -> anyhow::Result<PathBuf> {
    let path = out_dir.join(&file.filename);
    std::fs::write(&path, &file.bytes)?;
    Ok(path)
}
