use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use archivist::models::{
    DASHBOARD_ROUTE, EPISODE_INDEX, TRANSCRIPT_INDEX, dashboard_export, episode_index_mappings,
    episode_index_settings, transcript_index_mappings, transcript_index_settings,
};
use archivist::{
    ElasticClient, Episode, EpisodeDocument, KibanaClient, LineDocument, LineKind,
    collect_transcript_files, parse_transcript_file,
};

#[derive(Parser)]
#[command(name = "archivist")]
#[command(author, version, about = "Transcript indexing pipeline for The Magnus Archives", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse transcripts and load them into Elasticsearch and Kibana
    Index {
        /// Transcript files or directories to process
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(long, env = "LOGLEVEL", default_value = "info")]
        log_level: Level,

        /// Drop and recreate the Elasticsearch indices before indexing
        #[arg(long, env = "RECREATE_INDICES")]
        recreate_indices: bool,

        /// Drop and recreate the Kibana data views before importing
        #[arg(long, env = "RECREATE_KIBANA_VIEWS")]
        recreate_kibana_views: bool,

        /// Show whose transcripts are being indexed
        #[arg(long, env = "SHOW", value_enum, default_value = "magnus")]
        show: Show,

        /// Elasticsearch base URL
        #[arg(long, env = "ES_URL", default_value = "http://localhost:9200")]
        elasticsearch_url: String,

        /// Kibana base URL
        #[arg(long, env = "KB_URL", default_value = "http://localhost:5601")]
        kibana_url: String,
    },

    /// Parse transcripts and print a summary without touching any backend
    Inspect {
        /// Transcript files or directories to inspect
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(long, env = "LOGLEVEL", default_value = "info")]
        log_level: Level,
    },
}

/// Shows with a transcript parser
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Show {
    /// The Magnus Archives
    Magnus,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            paths,
            log_level,
            recreate_indices,
            recreate_kibana_views,
            show,
            elasticsearch_url,
            kibana_url,
        } => {
            setup_logging(log_level);
            match show {
                Show::Magnus => {
                    run_index(
                        paths,
                        recreate_indices,
                        recreate_kibana_views,
                        elasticsearch_url,
                        kibana_url,
                    )
                    .await
                }
            }
        }
        Commands::Inspect { paths, log_level } => {
            setup_logging(log_level);
            run_inspect(paths)
        }
    }
}

fn setup_logging(level: Level) {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run_index(
    paths: Vec<PathBuf>,
    recreate_indices: bool,
    recreate_kibana_views: bool,
    elasticsearch_url: String,
    kibana_url: String,
) -> Result<()> {
    let files: Vec<PathBuf> = paths
        .iter()
        .flat_map(|path| collect_transcript_files(path))
        .collect();
    info!("Found {} transcript files", files.len());

    let elastic = ElasticClient::new(&elasticsearch_url);
    if !elastic.ping().await {
        warn!("Unable to ping Elasticsearch host {}", elasticsearch_url);
    }
    setup_indices(&elastic, recreate_indices).await?;

    let kibana = KibanaClient::new(&kibana_url);
    setup_kibana(&kibana, recreate_kibana_views).await?;

    let mut indexed = 0;
    let mut failed = 0;
    for file in &files {
        match index_transcript(&elastic, file).await {
            Ok(()) => indexed += 1,
            Err(e) => {
                // One broken transcript should not stop the rest
                warn!("Unable to process transcript {:?}: {:#}", file, e);
                failed += 1;
            }
        }
    }

    info!("Complete: {} transcripts indexed, {} failed", indexed, failed);
    Ok(())
}

async fn setup_indices(elastic: &ElasticClient, recreate: bool) -> Result<()> {
    if recreate {
        info!("Recreating Elasticsearch indices");
        elastic.delete_index(TRANSCRIPT_INDEX).await?;
        elastic.delete_index(EPISODE_INDEX).await?;
    }
    elastic
        .create_index(
            TRANSCRIPT_INDEX,
            transcript_index_settings(),
            transcript_index_mappings(),
        )
        .await?;
    elastic
        .create_index(
            EPISODE_INDEX,
            episode_index_settings(),
            episode_index_mappings(),
        )
        .await?;
    Ok(())
}

async fn setup_kibana(kibana: &KibanaClient, recreate: bool) -> Result<()> {
    kibana.wait_until_ready().await?;
    if recreate {
        info!("Recreating Kibana data views");
        kibana.delete_index_pattern(TRANSCRIPT_INDEX).await?;
        kibana.delete_index_pattern(EPISODE_INDEX).await?;
    }
    kibana.create_index_pattern(TRANSCRIPT_INDEX).await?;
    kibana.create_index_pattern(EPISODE_INDEX).await?;
    kibana.import_saved_objects(&dashboard_export()).await?;
    kibana.set_default_route(DASHBOARD_ROUTE).await?;
    Ok(())
}

async fn index_transcript(elastic: &ElasticClient, path: &Path) -> Result<()> {
    info!("Indexing transcript {:?}", path);
    let episode = parse_transcript_file(path)?;

    let summary = EpisodeDocument::from_episode(&episode);
    elastic
        .put_document(EPISODE_INDEX, &summary.id(), &summary)
        .await?;
    for document in LineDocument::from_episode(&episode) {
        elastic
            .put_document(TRANSCRIPT_INDEX, &document.id(), &document)
            .await?;
    }

    info!(
        "Indexed MAG {} ({}): {} lines, {} content warnings",
        episode.episode_number,
        episode.episode_title,
        episode.lines.len(),
        episode.content_warnings.len()
    );
    Ok(())
}

fn run_inspect(paths: Vec<PathBuf>) -> Result<()> {
    let files: Vec<PathBuf> = paths
        .iter()
        .flat_map(|path| collect_transcript_files(path))
        .collect();
    info!("Found {} transcript files", files.len());

    for file in &files {
        match parse_transcript_file(file) {
            Ok(episode) => print_episode(&episode),
            Err(e) => warn!("Unable to parse transcript {:?}: {:#}", file, e),
        }
    }
    Ok(())
}

fn print_episode(episode: &Episode) {
    let speaking = episode
        .lines
        .iter()
        .filter(|line| line.kind == LineKind::Speaking)
        .count();
    let acting = episode
        .lines
        .iter()
        .filter(|line| line.kind == LineKind::Acting)
        .count();
    let sfx = episode
        .lines
        .iter()
        .filter(|line| line.kind == LineKind::Sfx)
        .count();

    println!("MAG {} - {}", episode.episode_number, episode.episode_title);
    println!("Season: {}", episode.season);
    println!("File: {}", episode.filename);
    println!("Content warnings: {:?}", episode.content_warnings);
    println!(
        "Lines: {} ({} speaking, {} acting, {} sfx)",
        episode.lines.len(),
        speaking,
        acting,
        sfx
    );
    println!("Characters: {:?}", episode.speakers());
    println!();
}
