use anyhow::Result;
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tripdesk::commands::lookup;
use tripdesk::config::{CONFIG_ENV, Config};
use tripdesk::provider::{
    CityQuery, CoinQuery, CountryQuery, CurrencyPair, FlightSearch, HotelSearch, ProviderKind,
};
use tripdesk::services::Services;
use tripdesk::{Failure, Outcome};

/// tripdesk - travel lookups for business trips
///
/// Queries country, crypto, currency, weather, flight and hotel providers and
/// prints the result as JSON. Failures are printed as a `{kind, message}`
/// payload on stderr.
///
/// Examples:
///   tripdesk country France
///   tripdesk rate USD EUR
///   tripdesk hotels Paris --check-in 2024-03-01 --check-out 2024-03-05
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (also via TRIPDESK_CONFIG)
    #[arg(long, env = CONFIG_ENV, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Send exactly one request per lookup
    #[arg(long, global = true)]
    no_retry: bool,

    #[arg(long, value_name = "URL", global = true)]
    country_url: Option<String>,

    #[arg(long, value_name = "URL", global = true)]
    crypto_url: Option<String>,

    #[arg(long, value_name = "URL", global = true)]
    currency_url: Option<String>,

    #[arg(long, value_name = "URL", global = true)]
    weather_url: Option<String>,

    #[arg(long, value_name = "URL", global = true)]
    flights_url: Option<String>,

    #[arg(long, value_name = "URL", global = true)]
    hotels_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Capital and population of a country
    Country {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// USD price and market cap of a coin
    Crypto {
        #[arg(value_name = "COIN_ID")]
        id: String,
    },

    /// Exchange rate between two currencies
    Rate {
        #[arg(value_name = "FROM")]
        from: String,
        #[arg(value_name = "TO")]
        to: String,
    },

    /// Current weather in a city
    Weather {
        #[arg(value_name = "CITY")]
        city: String,
    },

    /// Flight offers for a route and date
    Flights(FlightArgs),

    /// Hotel offers for a city and stay
    Hotels(HotelArgs),
}

#[derive(clap::Args, Debug)]
struct FlightArgs {
    #[arg(long, default_value = "BEG")]
    origin: String,

    #[arg(long, default_value = "BER")]
    destination: String,

    #[arg(long, default_value = "2024-03-01")]
    date: String,
}

#[derive(clap::Args, Debug)]
struct HotelArgs {
    #[arg(value_name = "CITY")]
    city: String,

    #[arg(long, value_name = "DATE")]
    check_in: String,

    #[arg(long, value_name = "DATE")]
    check_out: String,
}

impl Cli {
    /// File settings (if any) with command line overrides applied.
    fn settings(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        let overrides = [
            (ProviderKind::Country, &self.country_url),
            (ProviderKind::Crypto, &self.crypto_url),
            (ProviderKind::Currency, &self.currency_url),
            (ProviderKind::Weather, &self.weather_url),
            (ProviderKind::Flights, &self.flights_url),
            (ProviderKind::Hotels, &self.hotels_url),
        ];
        for (kind, url) in overrides {
            if let Some(url) = url {
                config.endpoints.set(kind, url.clone());
            }
        }
        Ok(config)
    }
}

async fn run(services: &Services, command: Commands, retry: bool) -> Outcome<Value> {
    match command {
        Commands::Country { name } => {
            lookup(&services.country, &CountryQuery::new(name), retry).await
        }
        Commands::Crypto { id } => lookup(&services.crypto, &CoinQuery::new(id), retry).await,
        Commands::Rate { from, to } => {
            lookup(&services.currency, &CurrencyPair::new(from, to), retry).await
        }
        Commands::Weather { city } => {
            lookup(&services.weather, &CityQuery::new(city), retry).await
        }
        Commands::Flights(args) => {
            let search = FlightSearch::new(args.origin, args.destination, args.date);
            lookup(&services.flights, &search, retry).await
        }
        Commands::Hotels(args) => {
            let search = HotelSearch::new(args.city, args.check_in, args.check_out);
            lookup(&services.hotels, &search, retry).await
        }
    }
}

fn print_failure(failure: &Failure) -> ExitCode {
    match serde_json::to_string_pretty(&failure.payload()) {
        Ok(payload) => eprintln!("{}", payload),
        Err(_) => eprintln!("{}", failure),
    }
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let services = Services::from_config(&cli.settings()?)?;

    match run(&services, cli.command, !cli.no_retry).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => Ok(print_failure(&failure)),
    }
}
