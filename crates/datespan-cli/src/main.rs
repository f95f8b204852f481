use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use datespan::{
    parse_span, Context, ContextConfig, Datespan, Span, TimePoint, Zone, DEFAULT_FORMAT,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "datespan",
    version,
    about = "Calendar spans, timezone offsets and date formatting"
)]
struct Cli {
    /// Default timezone for values without one (falls back to $TZ, then UTC)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Fixed RFC 3339 instant used as "now"
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a span string (2015, 2015-03, 2007-W14, 2015-03-10, start,end)
    Parse {
        /// Span string; empty input prints nothing
        value: String,

        /// List every day of the span
        #[arg(long)]
        days: bool,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the UTC offset of a zone at a date (default: now)
    Offset {
        /// IANA zone name, e.g. Europe/Berlin
        zone: String,

        /// Date or date-time, read as wall time in ZONE
        date: Option<String>,
    },
    /// Format a date with a strftime pattern
    Format {
        /// Date or date-time to format
        date: String,

        #[arg(long, default_value = DEFAULT_FORMAT)]
        pattern: String,

        /// Zone to display the date in (default: the date's own zone)
        #[arg(long)]
        zone: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = build_context(cli.timezone, cli.now)?;

    match cli.command {
        Command::Parse { value, days, json } => run_parse(&value, days, json, &ctx),
        Command::Offset { zone, date } => run_offset(&zone, date.as_deref(), &ctx),
        Command::Format {
            date,
            pattern,
            zone,
        } => run_format(&date, &pattern, zone.as_deref(), &ctx),
    }
}

fn build_context(timezone: Option<String>, now: Option<String>) -> Result<Context> {
    let default_timezone = match timezone {
        Some(name) => name,
        None => std::env::var("TZ")
            .ok()
            .filter(|name| Zone::resolve(name).is_ok())
            .unwrap_or_else(|| "UTC".to_string()),
    };
    let config = ContextConfig {
        default_timezone,
        now,
    };
    let ctx = Context::from_config(config).context("Failed to configure calendar context")?;
    tracing::debug!(zone = %ctx.default_zone(), clock = ?ctx.clock(), "calendar context ready");
    Ok(ctx)
}

fn run_parse(value: &str, list_days: bool, json: bool, ctx: &Context) -> Result<()> {
    let Some(span) = parse_span(value, ctx)? else {
        return Ok(());
    };
    let days: Vec<String> = if list_days {
        span.days().map(|day| day.to_string()).collect()
    } else {
        Vec::new()
    };

    if json {
        let mut doc = serde_json::json!({
            "span": span,
            "kind": kind(&span),
            "start": span.start(),
            "end": span.end(),
            "amount_of_days": span.amount_of_days(),
        });
        if list_days {
            doc["days"] = serde_json::json!(days);
        }
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("span:  {span} ({})", kind(&span));
    println!("start: {}", span.start());
    println!("end:   {}", span.end());
    println!("days:  {}", span.amount_of_days());
    for day in days {
        println!("  {day}");
    }
    Ok(())
}

fn run_offset(name: &str, date: Option<&str>, ctx: &Context) -> Result<()> {
    let zone = Zone::resolve(name)?;
    let point = match date {
        Some(date) => TimePoint::parse(date, Some(zone), ctx)?,
        None => ctx.now(),
    };
    let dst = if zone.is_dst(&point.to_utc()) {
        "DST"
    } else {
        "standard"
    };
    println!("{} {dst}", zone.offset(&point));
    Ok(())
}

fn run_format(date: &str, pattern: &str, zone: Option<&str>, ctx: &Context) -> Result<()> {
    let zone = zone.map(Zone::resolve).transpose()?;
    let point = TimePoint::parse(date, None, ctx)
        .with_context(|| format!("Failed to read date '{date}'"))?;
    println!("{}", point.format_in(pattern, zone.as_ref())?);
    Ok(())
}

fn kind(span: &Datespan) -> &'static str {
    match span {
        Datespan::Day(_) => "day",
        Datespan::Week(_) => "week",
        Datespan::Month(_) => "month",
        Datespan::Year(_) => "year",
        Datespan::Custom(_) => "custom",
    }
}
