use chrono::{DateTime, Utc};
use clap::Parser;
use sunside::airports::{resolve_endpoint, AirportDirectory};
use sunside::recommend::{compute_recommendation, render_ascii_summary};
use sunside::route::DEFAULT_SAMPLE_COUNT;
use sunside::server;

/// Sunside — seat-side sun recommendations for any flight.
///
/// Samples the great-circle route, computes the sun's position at each
/// point, and tells you which side of the cabin gets the views.
///
/// Examples:
///   sunside JFK LHR --departure 2024-06-21T22:00:00Z
///   sunside "40.6413,-73.7781" "51.47,-0.4543"
///   sunside ARN KEF --samples 50
///   sunside --serve --port 8080
#[derive(Parser)]
#[command(name = "sunside", version, about, long_about = None)]
struct Cli {
    /// Origin: IATA code, airport name, or "lat,lon".
    #[arg(index = 1)]
    from: Option<String>,

    /// Destination: IATA code, airport name, or "lat,lon".
    #[arg(index = 2)]
    to: Option<String>,

    /// Departure instant, RFC 3339 UTC (e.g. 2024-06-21T22:00:00Z).
    /// Defaults to now.
    #[arg(long, short = 'd')]
    departure: Option<String>,

    /// Number of route samples.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    samples: usize,

    /// Run the HTTP API server instead of a one-shot recommendation.
    #[arg(long)]
    serve: bool,

    /// Server bind address.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn main() {
    let cli = Cli::parse();

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start async runtime: {}", e);
            std::process::exit(1);
        });
        runtime.block_on(server::start(&cli.host, cli.port));
        return;
    }

    let (from, to) = match (&cli.from, &cli.to) {
        (Some(f), Some(t)) => (f, t),
        _ => {
            eprintln!("Error: No route specified.");
            eprintln!();
            eprintln!("Usage:");
            eprintln!("  sunside JFK LHR --departure 2024-06-21T22:00:00Z");
            eprintln!("  sunside \"40.6413,-73.7781\" \"51.47,-0.4543\"");
            eprintln!("  sunside --serve --port 8080");
            std::process::exit(1);
        }
    };

    let directory = AirportDirectory::new();
    let origin = resolve_endpoint(&directory, from).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let destination = resolve_endpoint(&directory, to).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let departure = match &cli.departure {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|e| {
                eprintln!("Error: Invalid departure '{}': {}", s, e);
                std::process::exit(1);
            }),
        None => Utc::now(),
    };

    let rec = compute_recommendation(origin, destination, departure, cli.samples)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    // ASCII summary to stderr, JSON to stdout
    eprint!("{}", render_ascii_summary(&rec));
    println!("{}", serde_json::to_string_pretty(&rec).unwrap());
}
