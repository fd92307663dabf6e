//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, parse_latest_bar};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::memory_review_store::MemoryReviewStore;
use crate::domain::config_validation::{self, validate_config};
use crate::domain::discipline::{ScoreLabel, score};
use crate::domain::error::TplanError;
use crate::domain::levels::PriceLevels;
use crate::domain::plan_card::PlanCard;
use crate::domain::price_bar::PriceBar;
use crate::domain::review::{self, ReviewAction, ReviewKey, ReviewPatch, ReviewRecord};
use crate::domain::session::{DEFAULT_MAX_TRADES, TradingSession};
use crate::domain::signal::Light;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::review_port::ReviewStore;

#[derive(Parser, Debug)]
#[command(name = "tplan", about = "Intraday T-trade planner: levels, signal light and discipline review")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where the daily bar comes from: a CSV file, or a code looked up in
/// `[data] csv_dir`.
#[derive(Args, Debug, Clone)]
pub struct BarSource {
    #[arg(long, conflicts_with = "code")]
    pub csv: Option<PathBuf>,
    #[arg(long, requires = "config")]
    pub code: Option<String>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show pivot, range and thresholds for the latest bar
    Levels {
        #[command(flatten)]
        source: BarSource,
        #[arg(long)]
        json: bool,
    },
    /// Print the pre-market plan card
    Plan {
        #[command(flatten)]
        source: BarSource,
        #[arg(long)]
        max_trades: Option<u32>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Evaluate the signal light for a current price
    Signal {
        #[command(flatten)]
        source: BarSource,
        #[arg(long)]
        price: String,
        #[arg(long)]
        max_trades: Option<u32>,
        /// T-trades already taken today (defaults to today's review record)
        #[arg(long)]
        trades: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Daily review checklist and discipline score
    Review {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[command(subcommand)]
        action: ReviewCommand,
    },
    /// List the configured watchlist
    Watchlist {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReviewCommand {
    /// Show the record and score
    Show,
    /// Count one completed T-trade
    Trade,
    /// Undo a mistaken trade count
    Undo,
    /// Update checklist fields
    Set {
        #[arg(long)]
        traded_only_when_bias: Option<bool>,
        #[arg(long)]
        respected_range: Option<bool>,
        #[arg(long)]
        avoided_neutral: Option<bool>,
        #[arg(long)]
        t_count: Option<u32>,
        #[arg(long, allow_hyphen_values = true)]
        pnl: Option<f64>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Print only the score
    Score,
}

impl ReviewCommand {
    fn action(&self) -> Option<ReviewAction> {
        match self {
            ReviewCommand::Show | ReviewCommand::Score => None,
            ReviewCommand::Trade => Some(ReviewAction::RecordTrade),
            ReviewCommand::Undo => Some(ReviewAction::UndoTrade),
            ReviewCommand::Set {
                traded_only_when_bias,
                respected_range,
                avoided_neutral,
                t_count,
                pnl,
                note,
            } => Some(ReviewAction::Patch(ReviewPatch {
                traded_only_when_bias: *traded_only_when_bias,
                respected_range: *respected_range,
                avoided_neutral: *avoided_neutral,
                t_count: *t_count,
                pnl: *pnl,
                note: note.clone(),
            })),
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Levels { source, json } => run_levels(&source, json),
        Command::Plan {
            source,
            max_trades,
            output,
        } => run_plan(&source, max_trades, output.as_deref()),
        Command::Signal {
            source,
            price,
            max_trades,
            trades,
            json,
        } => run_signal(&source, &price, max_trades, trades, json),
        Command::Review {
            config,
            code,
            date,
            action,
        } => run_review(&config, &code, date, &action),
        Command::Watchlist { config } => run_watchlist(&config),
        Command::Serve { config } => run_serve(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TplanError> {
    eprintln!("Loading config from {}", path.display());
    let config = FileConfigAdapter::from_file(path)?;
    validate_config(&config)?;
    tracing::debug!(source = config.source(), "config validated");
    Ok(config)
}

fn load_optional_config(source: &BarSource) -> Result<Option<FileConfigAdapter>, TplanError> {
    source.config.as_deref().map(load_config).transpose()
}

/// Resolve the bar and the code it belongs to.
pub fn resolve_bar(
    source: &BarSource,
    config: Option<&dyn ConfigPort>,
) -> Result<(String, PriceBar), TplanError> {
    if let Some(path) = &source.csv {
        let content = fs::read_to_string(path)?;
        let bar = parse_latest_bar(&content)?;
        let code = source
            .code
            .clone()
            .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_default()
            .to_uppercase();
        return Ok((code, bar));
    }

    let code = source.code.as_deref().ok_or_else(|| TplanError::ConfigMissing {
        section: "data".into(),
        key: "csv (use --csv or --code with --config)".into(),
    })?;
    let config = config.ok_or_else(|| TplanError::ConfigMissing {
        section: "data".into(),
        key: "csv_dir".into(),
    })?;
    let dir = config
        .get_string("data", "csv_dir")
        .ok_or_else(|| TplanError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        })?;
    let adapter = CsvAdapter::new(PathBuf::from(dir));
    Ok((code.to_uppercase(), adapter.latest_bar(code)?))
}

/// Open the review store named by `[review] backend`.
pub fn open_review_store(config: &dyn ConfigPort) -> Result<Box<dyn ReviewStore + Send + Sync>, TplanError> {
    match config_validation::review_backend(config).as_str() {
        "memory" => {
            tracing::warn!("memory review backend: records are lost on exit");
            Ok(Box::new(MemoryReviewStore::new()))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let adapter = crate::adapters::sqlite_adapter::SqliteAdapter::from_config(config)?;
            adapter.initialize_schema()?;
            Ok(Box::new(adapter))
        }
        other => Err(TplanError::ConfigInvalid {
            section: "review".into(),
            key: "backend".into(),
            reason: format!("backend '{other}' is not available in this build"),
        }),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), TplanError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| TplanError::Io(e.into()))?;
    println!("{text}");
    Ok(())
}

fn run_levels(source: &BarSource, json: bool) -> Result<ExitCode, TplanError> {
    let config = load_optional_config(source)?;
    let (code, bar) = resolve_bar(source, config.as_ref().map(|c| c as &dyn ConfigPort))?;
    let levels = PriceLevels::from_bar(&bar)?;
    let session = TradingSession::new(&code, levels, DEFAULT_MAX_TRADES);
    let t = session.thresholds();

    if json {
        print_json(&serde_json::json!({
            "code": session.code(),
            "levels": session.levels(),
            "thresholds": t,
        }))?;
    } else {
        let l = session.levels();
        println!("{} last trading day {}", session.code(), l.last_date);
        println!("  close={} | pivot={} | range={}", l.close, l.pivot, l.range);
        println!(
            "  min={} | good={} | max={} | buffer={}",
            t.min, t.good, t.max, t.buffer
        );
        if t.is_degenerate() {
            eprintln!("warning: range is zero, every zone collapses onto the pivot");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn resolve_max_trades(flag: Option<u32>, config: Option<&FileConfigAdapter>) -> u32 {
    flag.unwrap_or_else(|| {
        config
            .map(|c| config_validation::max_trades(c))
            .unwrap_or(DEFAULT_MAX_TRADES)
    })
}

fn run_plan(
    source: &BarSource,
    max_trades: Option<u32>,
    output: Option<&Path>,
) -> Result<ExitCode, TplanError> {
    let config = load_optional_config(source)?;
    let (code, bar) = resolve_bar(source, config.as_ref().map(|c| c as &dyn ConfigPort))?;
    let levels = PriceLevels::from_bar(&bar)?;
    let max_trades = resolve_max_trades(max_trades, config.as_ref());
    let session = TradingSession::new(&code, levels, max_trades);

    let watchlist = match &config {
        Some(c) => config_validation::watchlist(c)?,
        None => Default::default(),
    };
    let plan = session.plan();
    if plan.is_zero_width() {
        tracing::warn!(code = session.code(), "zero range, plan has no width");
    }
    let card = PlanCard {
        code: session.code(),
        name: watchlist.lookup(session.code()),
        levels: session.levels(),
        plan: &plan,
        max_trades,
    }
    .render();

    match output {
        Some(path) => {
            fs::write(path, &card)?;
            eprintln!("Plan card written to: {}", path.display());
        }
        None => println!("{card}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_signal(
    source: &BarSource,
    price: &str,
    max_trades: Option<u32>,
    trades: Option<u32>,
    json: bool,
) -> Result<ExitCode, TplanError> {
    let config = load_optional_config(source)?;
    let (code, bar) = resolve_bar(source, config.as_ref().map(|c| c as &dyn ConfigPort))?;
    let levels = PriceLevels::from_bar(&bar)?;
    let max_trades = resolve_max_trades(max_trades, config.as_ref());

    let trade_count = match (trades, &config) {
        (Some(n), _) => n,
        (None, Some(c)) => {
            let store = open_review_store(c)?;
            review::load_or_default(store.as_ref(), &ReviewKey::today(&code))?.t_count
        }
        (None, None) => 0,
    };

    // One price per run: `[plan] hold_bias` only matters to the long-lived
    // server sessions.
    let mut session = TradingSession::new(&code, levels, max_trades);
    session.set_trade_count(trade_count);
    session.set_price_input(price);
    if session.current_price().is_none() {
        eprintln!("warning: '{price}' is not a price");
    }

    let analysis = session.analysis();
    if json {
        print_json(&analysis)?;
    } else {
        let s = &analysis.signal;
        let marker = if s.is_executable() { " *" } else { "" };
        println!("[{}]{marker} {}", s.light.to_string().to_uppercase(), s.title);
        if !s.message.is_empty() {
            println!("  {}", s.message);
        }
        if !s.reasons.is_empty() {
            println!("  reasons: {}", s.reasons.join("; "));
        }
        println!(
            "  bias: {} | T-trades {}/{}",
            analysis.status, analysis.trade_count, analysis.max_trades
        );
    }

    // Scripts can branch on the light without parsing output.
    Ok(match analysis.signal.light {
        Light::Green => ExitCode::SUCCESS,
        Light::Yellow => ExitCode::from(10),
        Light::Red => ExitCode::from(11),
        Light::Grey => ExitCode::from(12),
    })
}

fn print_review(record: &ReviewRecord, max_trades: u32) {
    let score = score(record, max_trades);
    println!("Review {}", record.date);
    println!("  traded only when biased:  {}", record.traded_only_when_bias);
    println!("  respected max excursion:  {}", record.respected_range);
    println!("  held off in neutral band: {}", record.avoided_neutral);
    println!("  T-trades: {} / {}", record.t_count, max_trades);
    println!("  pnl: {}", record.pnl);
    if !record.note.is_empty() {
        println!("  note: {}", record.note);
    }
    println!("  discipline score: {score} / 100 ({})", ScoreLabel::for_score(score));
}

fn run_review(
    config_path: &Path,
    code: &str,
    date: Option<NaiveDate>,
    command: &ReviewCommand,
) -> Result<ExitCode, TplanError> {
    let config = load_config(config_path)?;
    if command.action().is_some() && config_validation::review_backend(&config) == "memory" {
        return Err(TplanError::ConfigInvalid {
            section: "review".into(),
            key: "backend".into(),
            reason: "memory backend does not persist between runs, set [sqlite] path to record reviews"
                .into(),
        });
    }
    let store = open_review_store(&config)?;
    let key = match date {
        Some(d) => ReviewKey::new(code, d),
        None => ReviewKey::today(code),
    };
    let max_trades = config_validation::max_trades(&config);

    let record = match command.action() {
        Some(action) => review::apply(store.as_ref(), &key, action)?,
        None => review::load_or_default(store.as_ref(), &key)?,
    };

    match command {
        ReviewCommand::Score => println!("{}", score(&record, max_trades)),
        _ => print_review(&record, max_trades),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_watchlist(config_path: &Path) -> Result<ExitCode, TplanError> {
    let config = load_config(config_path)?;
    let watchlist = config_validation::watchlist(&config)?;
    if watchlist.is_empty() {
        eprintln!("Watchlist is empty");
    }

    // Mark codes that have a bar file when a data directory is configured.
    let available = match config.get_string("data", "csv_dir") {
        Some(dir) => Some(CsvAdapter::new(PathBuf::from(dir)).list_codes()?),
        None => None,
    };
    for entry in &watchlist.entries {
        let data = match &available {
            Some(codes) if codes.contains(&entry.code) => "\tcsv",
            Some(_) => "\tno data",
            None => "",
        };
        println!("{}\t{}{data}", entry.code, entry.name);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_serve(config_path: &Path) -> Result<ExitCode, TplanError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;
        use std::sync::Arc;

        let config = load_config(config_path)?;
        let store: Arc<dyn ReviewStore + Send + Sync> = Arc::from(open_review_store(&config)?);

        // Validated by load_config.
        let addr: SocketAddr = config
            .get_string("web", "listen")
            .unwrap_or_else(|| config_validation::DEFAULT_LISTEN.to_string())
            .trim()
            .parse()
            .map_err(|_| TplanError::ConfigInvalid {
                section: "web".into(),
                key: "listen".into(),
                reason: "not a socket address".into(),
            })?;

        let state = AppState::new(
            store,
            config_validation::watchlist(&config)?,
            config_validation::max_trades(&config),
            config.get_bool("plan", "hold_bias", false),
        );
        let router = build_router(state);

        eprintln!("Starting web server on {}", addr);
        tracing::info!(%addr, "starting web server");

        tokio::runtime::Runtime::new()?.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        })?;

        Ok(ExitCode::SUCCESS)
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        Ok(ExitCode::from(1))
    }
}
