use std::io::IsTerminal;
use std::process;

use clap::{CommandFactory, Parser};

use farewatch::config::Config;
use farewatch::error::WatchError;
use farewatch::fetch::{ApiClient, FetchOptions};
use farewatch::mail::SmtpMailer;
use farewatch::query::{self, HourRange, Passengers, SearchRequest};
use farewatch::table;

#[derive(Parser)]
#[command(
    name = "farewatch",
    about = "Watch 15 days of direct flight offers and email the cheap ones",
    version,
    after_help = "\
Environment:
  FLIGHT_API_KEY                       flight offer API key (required)
  SMTP_HOST, SMTP_USER, SMTP_PASSWORD  mail transport (required unless --dry-run)
  SMTP_PORT, MAIL_FROM                 optional, default 465 and SMTP_USER
                                       (465 uses implicit TLS, other ports STARTTLS)

Examples:
  farewatch search -f ORY -t LIS -d 20240601 -e me@example.com
  farewatch search -f ORY -t LIS -d 20240601 -e me@example.com --max-price 200 --hours 9-17
  farewatch search -f AMS -t BCN -d 20240601 -e a@example.com,b@example.com --adults 1 --children 1
  farewatch search -f ORY -t LIS -d 20240601 -e me@example.com --dry-run"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(
        about = "Scan 15 departure days and mail matching offers",
        long_about = "Search direct flights for 15 consecutive departure days starting at --date.\n\
            Offers cheaper than --max-price per passenger and leaving within --hours\n\
            are collected into a single email. No email is sent when nothing matches."
    )]
    Search(SearchArgs),
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(short, long, value_name = "IATA", help = "Departure airport code")]
    from: Option<String>,

    #[arg(short, long, value_name = "IATA", help = "Arrival airport code")]
    to: Option<String>,

    #[arg(
        short, long,
        value_name = "YYYYMMDD",
        help = "First departure date of the scan window",
        long_help = "First departure date of the 15-day scan window, as YYYYMMDD \
            (YYYY-MM-DD is accepted too)."
    )]
    date: Option<String>,

    #[arg(
        short, long,
        value_name = "ADDR[,ADDR...]",
        help = "Recipient email address(es)",
        long_help = "Where to send the report. Comma-separate several addresses."
    )]
    email: Option<String>,

    #[arg(
        long,
        default_value = "1000",
        value_name = "AMOUNT",
        help = "Keep offers strictly cheaper than this, per passenger"
    )]
    max_price: f64,

    #[arg(long, default_value = "2", value_name = "N", help = "Number of adult passengers")]
    adults: u32,

    #[arg(long, default_value = "0", value_name = "N", help = "Number of child passengers")]
    children: u32,

    #[arg(
        long,
        default_value = "0-24",
        value_name = "H-H",
        help = "Inclusive local departure hour range",
        long_help = "Inclusive range of local departure hours, e.g. 9-17 keeps flights \
            leaving between 09:00 and 17:59."
    )]
    hours: String,

    #[arg(long, help = "Print matches as a table instead of sending an email")]
    dry_run: bool,

    #[arg(long, value_name = "URL", help = "HTTP or SOCKS5 proxy")]
    proxy: Option<String>,

    #[arg(long, default_value = "30", value_name = "SECS", help = "Request timeout")]
    timeout: u64,

    #[arg(short, long, help = "Log each request")]
    verbose: bool,
}

fn error_code(err: &WatchError) -> i32 {
    match err {
        WatchError::MissingArgument(_) | WatchError::MissingEnv(_) => 1,
        WatchError::InvalidAirport(_)
        | WatchError::InvalidDate(_)
        | WatchError::InvalidHourRange(_)
        | WatchError::InvalidAddress(_)
        | WatchError::Validation(_) => 2,
        WatchError::Mail(_) => 3,
        WatchError::Timeout
        | WatchError::ConnectionFailed(_)
        | WatchError::DnsResolution(_)
        | WatchError::ProxyError(_)
        | WatchError::TlsError(_)
        | WatchError::HttpStatus { .. }
        | WatchError::JsonParse { .. } => 4,
    }
}

fn search_usage() -> String {
    let mut cmd = Cli::command();
    cmd.build();
    cmd.find_subcommand_mut("search")
        .map(|sub| sub.render_usage().to_string())
        .unwrap_or_default()
}

fn die(err: &WatchError) -> ! {
    eprintln!("error: {err}");
    if matches!(err, WatchError::MissingArgument(_)) {
        eprintln!();
        eprintln!("{}", search_usage());
        eprintln!();
        eprintln!("For more information, try 'farewatch search --help'.");
    }
    process::exit(error_code(err));
}

fn build_request(args: &SearchArgs) -> Result<SearchRequest, WatchError> {
    let from = args
        .from
        .as_ref()
        .ok_or(WatchError::MissingArgument("--from"))?;
    let to = args.to.as_ref().ok_or(WatchError::MissingArgument("--to"))?;
    let date = args
        .date
        .as_ref()
        .ok_or(WatchError::MissingArgument("--date"))?;
    let email = args
        .email
        .as_ref()
        .ok_or(WatchError::MissingArgument("--email"))?;

    let recipients: Vec<String> = email
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let request = SearchRequest {
        origin: from.trim().to_uppercase(),
        destination: to.trim().to_uppercase(),
        start_date: query::parse_date(date)?,
        passengers: Passengers {
            adults: args.adults,
            children: args.children,
        },
        max_price: args.max_price,
        hours: HourRange::parse(&args.hours)?,
        recipients,
    };
    request.validate()?;
    Ok(request)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_max_level(level)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => {
            init_logging(args.verbose);

            let request = build_request(&args).unwrap_or_else(|e| die(&e));
            let config = Config::from_env().unwrap_or_else(|e| die(&e));

            let mailer = if args.dry_run {
                None
            } else {
                let mail_config = config.require_mail().unwrap_or_else(|e| die(&e));
                Some(
                    SmtpMailer::new(mail_config, &request.recipients)
                        .unwrap_or_else(|e| die(&e)),
                )
            };

            let client = ApiClient::new(&FetchOptions {
                base_url: config.api_url.clone(),
                api_key: config.api_key.clone(),
                proxy: args.proxy.clone(),
                timeout: args.timeout,
            })
            .unwrap_or_else(|e| die(&e));

            tracing::info!(
                "scanning {} -> {} from {} for {} days",
                request.origin,
                request.destination,
                query::format_api_date(request.start_date),
                query::SCAN_DAYS
            );

            let report = farewatch::scan(&request, &client).await;

            match mailer {
                None => {
                    if report.is_empty() {
                        println!("No matching flights found.");
                    } else {
                        println!("{}", table::render(&report));
                    }
                }
                Some(mailer) => match farewatch::notify(&request, &report, &mailer).await {
                    Ok(true) => tracing::info!("mailed {} offer(s)", report.len()),
                    Ok(false) => tracing::info!("no matching offers, nothing to send"),
                    Err(e) => {
                        tracing::error!("{e}");
                        process::exit(error_code(&e));
                    }
                },
            }
        }
    }
}
