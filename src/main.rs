use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use common::cli::{CommonArgs, CommonCommands, utils};
use common::config::Configuration;
use common::storage::create_object_store;
use retention::{Grouper, PlanOutcome, RetentionCount, select};
use sweeper::{
    DEFAULT_SAMPLE_PREFIXES, DEFAULT_SAMPLE_SUFFIXES, ObjectLister, Seeder, SweepReport, Sweeper,
    SweeperConfig,
};

#[derive(Parser)]
#[command(name = "deploysweep")]
#[command(about = "Keep the most recent deployments in a bucket and delete the rest")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Only consider objects under this key prefix
    #[arg(long, global = true)]
    prefix: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the deletion of old deployments and optionally execute it (default)
    Sweep(SweepArgs),
    /// List objects and the deployments they belong to
    List,
    /// Create sample deployment objects
    Seed {
        /// Deployment prefix to create (repeatable)
        #[arg(long = "deployment")]
        deployments: Vec<String>,
        /// File suffix created in every deployment (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,
    },
    #[command(flatten)]
    Common(CommonCommands),
}

#[derive(Args, Default)]
struct SweepArgs {
    /// Number of most recent deployments to keep
    #[arg(short, long, visible_alias = "deploys", allow_negative_numbers = true)]
    keep: Option<i64>,

    /// Delete the objects instead of only reporting them
    #[arg(long)]
    delete: bool,

    /// Exit with an error when there is nothing to delete
    #[arg(long)]
    fail_on_empty: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::init_logging(&cli.common);

    let mut config = utils::load_config(cli.common.config.as_ref())?;
    if let Some(prefix) = cli.prefix {
        config.storage.prefix = Some(prefix);
    }

    match cli.command.unwrap_or(Commands::Sweep(SweepArgs::default())) {
        Commands::Common(command) => utils::handle_common_command(&command, &config),
        Commands::Sweep(args) => sweep(config, args).await,
        Commands::List => list(&config).await,
        Commands::Seed { deployments, files } => seed(&config, deployments, files).await,
    }
}

async fn sweep(mut config: Configuration, args: SweepArgs) -> Result<()> {
    if let Some(keep) = args.keep {
        config.retention.keep = keep;
    }
    if args.delete {
        config.sweep.dry_run = false;
    }
    if args.fail_on_empty {
        config.sweep.fail_on_empty = true;
    }

    RetentionCount::new(config.retention.keep)
        .context("No deployments selected; pass --keep with a positive number")?;
    config.validate()?;

    let object_store = create_object_store(&config.storage)?;
    let sweeper = Sweeper::new(SweeperConfig::from(&config), object_store);

    let report = sweeper.run().await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize sweep report")?
        );
    } else {
        print_report(&report);
    }

    let metrics = sweeper.metrics();
    log::info!(
        "Sweep finished in {}ms: {} listed, {} planned, {} deleted, {} failed",
        metrics.total_duration_ms(),
        metrics.objects_listed(),
        metrics.objects_planned(),
        metrics.objects_deleted(),
        metrics.deletions_failed()
    );

    match &report.deletion {
        Some(deletion) if deletion.failed_count > 0 => anyhow::bail!(
            "{} of {} deletions failed",
            deletion.failed_count,
            report.plan.deletion.len()
        ),
        _ => Ok(()),
    }
}

fn print_report(report: &SweepReport) {
    println!("Most Recent Deployments:");
    for group in report.plan.retained.groups() {
        println!("{}\t{}", group.prefix, group.recency.to_rfc3339());
    }

    match report.outcome() {
        PlanOutcome::NothingToDelete => {
            println!("No objects to delete.");
        }
        PlanOutcome::Delete {
            objects,
            deployments,
        } => {
            println!("Found {objects} objects to delete from {deployments} deployments.");
            for key in &report.plan.deletion.keys {
                println!("Marked for deletion: {key}");
            }
        }
    }

    if let Some(deletion) = &report.deletion {
        if deletion.dry_run {
            println!("Dry run: nothing was deleted. Pass --delete to remove these objects.");
        } else {
            println!(
                "Deleted {} objects ({} failed).",
                deletion.deleted_count, deletion.failed_count
            );
            for (key, error) in &deletion.failed_deletions {
                println!("Failed to delete {key}: {error}");
            }
        }
    }

    if let Some(remaining) = &report.remaining {
        println!("Remaining objects in bucket:");
        for key in remaining {
            println!("\t{key}");
        }
    }
}

async fn list(config: &Configuration) -> Result<()> {
    let object_store = create_object_store(&config.storage)?;
    let objects = ObjectLister::new(object_store)
        .with_prefix(config.storage.prefix.as_deref())
        .list_objects()
        .await?;

    println!("Objects:");
    for object in &objects {
        println!(
            "{}\t{}\t{}",
            object.key,
            object.last_modified.to_rfc3339(),
            object.size_bytes
        );
    }

    let groups = Grouper::new(config.retention.delimiter).group(&objects);
    let ranked = select(&groups, i64::MAX)?;

    println!("Deployments (most recent first):");
    for group in ranked.groups() {
        println!("{}\t{}", group.prefix, group.recency.to_rfc3339());
    }

    Ok(())
}

async fn seed(config: &Configuration, deployments: Vec<String>, files: Vec<String>) -> Result<()> {
    let object_store = create_object_store(&config.storage)?;

    let mut deployments = if deployments.is_empty() {
        DEFAULT_SAMPLE_PREFIXES
            .iter()
            .map(|p| p.to_string())
            .collect()
    } else {
        deployments
    };
    if let Some(prefix) = &config.storage.prefix {
        for deployment in &mut deployments {
            *deployment = format!("{prefix}/{deployment}");
        }
    }

    let files = if files.is_empty() {
        DEFAULT_SAMPLE_SUFFIXES
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        files
    };

    let keys = Seeder::new(object_store).seed(&deployments, &files).await?;
    for key in &keys {
        println!("Created: {key}");
    }

    Ok(())
}
