use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{info, warn};

use wordprint::cohort::{self, CohortFilter, GroupBy};
use wordprint::config::Config;
use wordprint::document::manifest::load as load_manifest;
use wordprint::document::records::{load as load_records, save as save_records};
use wordprint::output::terminal;

/// wordprint: vocabulary statistics and reuse detection for text reports.
///
/// Normalizes report texts, measures how varied their vocabulary is, and
/// compares documents and authors by how much of it they share.
#[derive(Parser)]
#[command(name = "wordprint", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the documents listed in a manifest and save their records
    Ingest {
        /// JSON manifest listing text files and their metadata
        #[arg(long)]
        manifest: PathBuf,

        /// Where to write the computed records
        #[arg(long)]
        out: PathBuf,
    },

    /// Show per-document statistics and top words
    Show {
        records: PathBuf,

        /// Only documents whose title contains this text
        #[arg(long)]
        title: Option<String>,
    },

    /// Average statistics per cohort
    Stats {
        records: PathBuf,

        /// Partition by author, group, course, faculty or department.
        /// Without it, all matching documents form one cohort.
        #[arg(long)]
        by: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Rank the authors of one group by vocabulary variety
    Group { records: PathBuf, group: u32 },

    /// Compare authors of one group by shared vocabulary
    Compare {
        records: PathBuf,

        #[arg(long)]
        group: u32,

        /// Comma-separated authors (default: everyone in the group)
        #[arg(long, value_delimiter = ',')]
        authors: Vec<String>,
    },

    /// Find documents with heavily overlapping word sequences
    Duplicates {
        records: PathBuf,

        /// Minimum shingle overlap, in percent (default: 60)
        #[arg(long, default_value = "60")]
        threshold: f64,
    },

    /// Show a summary of a records file
    Status { records: PathBuf },
}

/// Optional metadata constraints; unset flags match everything.
#[derive(clap::Args)]
struct FilterArgs {
    #[arg(long)]
    group: Option<u32>,
    #[arg(long)]
    course: Option<u8>,
    #[arg(long)]
    faculty: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    author: Option<String>,
}

impl From<FilterArgs> for CohortFilter {
    fn from(args: FilterArgs) -> Self {
        CohortFilter {
            group: args.group,
            course: args.course,
            faculty: args.faculty,
            department: args.department,
            author: args.author,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wordprint=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { manifest, out } => {
            let config = Config::load()?;
            let pipeline = config.pipeline()?.with_progress(true);
            info!(
                language = %config.language,
                top_k = config.top_k,
                shingle_width = config.shingle_width,
                "Starting ingestion"
            );

            let documents = load_manifest(&manifest)?;
            println!("Analyzing {} documents...", documents.len());

            let outcome = pipeline.process_batch(&documents);
            let failed = outcome.failed();
            let records = outcome.into_records();
            save_records(&out, &records)?;

            println!(
                "{}",
                format!("Saved {} records to {}", records.len(), out.display()).bold()
            );
            if failed > 0 {
                println!(
                    "  {} {} documents could not be analyzed (see log above)",
                    "Warning:".yellow(),
                    failed
                );
            }
        }

        Commands::Show { records, title } => {
            let records = load_records(&records)?;
            let shown: Vec<_> = records
                .iter()
                .filter(|r| {
                    title
                        .as_deref()
                        .map_or(true, |t| r.metadata.title.contains(t))
                })
                .collect();
            if shown.is_empty() {
                println!("No matching documents.");
            }
            for record in shown {
                terminal::display_record(record);
            }
        }

        Commands::Stats {
            records,
            by,
            filter,
        } => {
            let records = load_records(&records)?;
            let filter = CohortFilter::from(filter);
            match by {
                Some(by) => {
                    let group_by: GroupBy = by.parse()?;
                    let cohorts = cohort::aggregate_cohorts(&records, group_by, &filter);
                    terminal::display_cohorts(group_by, &filter, &cohorts);
                }
                None => {
                    let agg = cohort::aggregate_matching(&records, &filter)
                        .with_context(|| format!("Cannot compute statistics for {filter}"))?;
                    println!("\n{}", format!("=== {filter} ===").bold());
                    println!("  Reports: {}", agg.report_count);
                    println!(
                        "  Average tokens: {:.1}  unique: {:.1}  unique share: {:.1}%",
                        agg.avg_total_tokens, agg.avg_unique_count, agg.avg_percent_unique
                    );
                    println!(
                        "  Average characters: {:.1} raw, {:.1} cleaned",
                        agg.avg_raw_chars, agg.avg_clean_chars
                    );
                    println!("  Combined vocabulary: {} words", agg.union_unique_count);
                }
            }
        }

        Commands::Group { records, group } => {
            let records = load_records(&records)?;
            let by_author = cohort::aggregate(&records, |r| {
                let m = &r.metadata;
                (m.group == Some(group)).then(|| (group, m.author.clone()))
            });
            let ranked = cohort::rank_within(by_author.into_values(), |k| k.0);
            terminal::display_group_ranking(group, &ranked);
        }

        Commands::Compare {
            records,
            group,
            authors,
        } => {
            let records = load_records(&records)?;
            let matrix = cohort::compare_authors(&records, group, &authors);
            terminal::display_matrix(&matrix);
        }

        Commands::Duplicates { records, threshold } => {
            let records = load_records(&records)?;
            let scan = cohort::near_duplicates(&records, threshold)?;
            if !scan.skipped.is_empty() {
                warn!(
                    skipped = scan.skipped.len(),
                    "Some documents have no usable fingerprint"
                );
            }
            terminal::display_duplicates(&records, &scan, threshold);
        }

        Commands::Status { records } => {
            wordprint::status::show(&records)?;
        }
    }

    Ok(())
}
