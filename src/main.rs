use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use dashboard::AnalyticsService;
// Import database types directly from the database crate
use database::connection::{connect, run_migrations};
use database::repository::DbRepository;
use platform_adapters::{create_adapter, EventMapping, PlatformCredentials};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// The main entry point for the Overzeer analytics application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = configuration::load_config()?;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => {
            let addr: SocketAddr =
                format!("{}:{}", config.server.host, config.server.port).parse()?;
            web_server::run_server(addr, &config.database).await?;
        }
        Commands::Analyze(args) => {
            let repo = connect_repo(&config.database).await?;
            handle_analyze(args, &repo).await?;
        }
        Commands::Overview(args) => {
            let repo = connect_repo(&config.database).await?;
            handle_overview(args, &repo).await?;
        }
        Commands::Sync(args) => {
            let repo = connect_repo(&config.database).await?;
            handle_sync(args, &repo).await?;
        }
    }

    Ok(())
}

async fn connect_repo(settings: &configuration::Database) -> anyhow::Result<DbRepository> {
    let db_pool = connect(settings).await?;
    run_migrations(&db_pool).await?;
    Ok(DbRepository::new(db_pool))
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Ticket sales tracking and analytics for live events.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server exposing the analytics API.
    Serve,
    /// Print the analytics report for a single event.
    Analyze(AnalyzeArgs),
    /// Print the account-wide overview for a user.
    Overview(OverviewArgs),
    /// Pull sales from a ticketing platform into the local store.
    Sync(SyncArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The event to analyze.
    #[arg(long)]
    event_id: Uuid,
}

#[derive(Parser)]
struct OverviewArgs {
    /// The user whose events to summarize.
    #[arg(long)]
    user_id: Uuid,
}

#[derive(Parser)]
struct SyncArgs {
    /// The local event the platform sales belong to.
    #[arg(long)]
    event_id: Uuid,

    /// The registered platform name (e.g., "Megatix").
    #[arg(long)]
    platform: String,

    /// The event's id on the external platform.
    #[arg(long)]
    external_event_id: String,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Computes and prints the full analytics report for one event.
async fn handle_analyze(args: AnalyzeArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let service = AnalyticsService::new();
    let analytics = service.event_analytics(repo, args.event_id).await?;

    let mut totals = Table::new();
    totals.set_header(vec!["Total Revenue", "Fees", "Net Revenue", "Tickets Sold"]);
    totals.add_row(vec![
        analytics.revenue.total_revenue.to_string(),
        analytics.revenue.total_fees.to_string(),
        analytics.revenue.net_revenue.to_string(),
        analytics.velocity.total_tickets_sold.to_string(),
    ]);
    println!("{totals}");

    let mut platforms = Table::new();
    platforms.set_header(vec!["Platform", "Revenue", "Fees", "Net", "Tickets"]);
    for group in &analytics.revenue.by_platform {
        platforms.add_row(vec![
            group.platform_name.clone(),
            group.revenue.to_string(),
            group.fees.to_string(),
            group.net_revenue.to_string(),
            group.tickets_sold.to_string(),
        ]);
    }
    println!("{platforms}");

    let mut ticket_types = Table::new();
    ticket_types.set_header(vec!["Ticket Type", "Revenue", "Tickets", "Avg Price"]);
    for group in &analytics.revenue.by_ticket_type {
        ticket_types.add_row(vec![
            group.ticket_type.clone(),
            group.revenue.to_string(),
            group.tickets_sold.to_string(),
            group.avg_price.to_string(),
        ]);
    }
    println!("{ticket_types}");

    let velocity = &analytics.velocity;
    println!(
        "Velocity: {}/day ({}/week), trend {}",
        velocity.daily_average,
        velocity.weekly_average,
        velocity.trend.as_str()
    );

    let projections = &analytics.projections;
    println!(
        "Projection: {} tickets / {} revenue ({} confidence)",
        projections.projected_total_tickets,
        projections.projected_total_revenue,
        projections.confidence_level.as_str()
    );
    if let Some(percentage) = projections.percentage_sold {
        println!("Sold {percentage}% of capacity");
    }
    if let Some(days) = projections.days_until_sellout {
        println!("Projected sellout in {} days", days.round_dp(1));
    }

    Ok(())
}

/// Prints the per-event summaries and recent activity for a user.
async fn handle_overview(args: OverviewArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let service = AnalyticsService::new();
    let overview = service.account_overview(repo, args.user_id).await?;

    println!(
        "{} events, {} tickets, {} revenue ({} fees)",
        overview.total_events,
        overview.total_tickets_sold,
        overview.total_revenue,
        overview.total_fees
    );

    let mut events = Table::new();
    events.set_header(vec!["Event", "Date", "Revenue", "Tickets"]);
    for summary in &overview.event_summaries {
        events.add_row(vec![
            summary.event_name.clone(),
            summary.date.to_string(),
            summary.revenue.to_string(),
            summary.tickets_sold.to_string(),
        ]);
    }
    println!("{events}");

    let mut recent = Table::new();
    recent.set_header(vec!["Sold At", "Event", "Platform", "Qty", "Revenue"]);
    for sale in &overview.recent_sales {
        recent.add_row(vec![
            sale.sold_at.to_rfc3339(),
            sale.event_name.clone(),
            sale.platform_name.clone(),
            sale.quantity.to_string(),
            sale.revenue.to_string(),
        ]);
    }
    println!("{recent}");

    Ok(())
}

/// Runs one sync pass against a platform and persists the new records.
async fn handle_sync(args: SyncArgs, repo: &DbRepository) -> anyhow::Result<()> {
    // The event must exist before we attribute platform sales to it.
    let event = repo
        .get_event(args.event_id)
        .await
        .with_context(|| format!("event {} not found", args.event_id))?;
    let platform = repo.get_platform_by_name(&args.platform).await
        .with_context(|| format!("platform '{}' is not registered", args.platform))?;
    let adapter = create_adapter(&platform.name)?;

    let mapping = EventMapping {
        event_id: event.id,
        platform_id: platform.id,
        external_event_id: args.external_event_id,
    };
    let existing = repo.get_external_sale_ids(event.id, platform.id).await?;

    // Credentials would come from the platform connection settings; the
    // current adapters are synthetic and accept anything.
    let outcome = adapter
        .sync(&mapping, &PlatformCredentials::default(), &existing)
        .await;

    if !outcome.success {
        anyhow::bail!("sync failed: {}", outcome.errors.join("; "));
    }

    repo.save_platform_sales(event.id, platform.id, &outcome.imported)
        .await?;

    println!(
        "Synced {} from {}: {} imported, {} already known",
        event.name,
        platform.name,
        outcome.sales_imported(),
        outcome.skipped
    );

    Ok(())
}
