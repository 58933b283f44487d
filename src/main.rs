use crate::error::{parse_amount, PortfolioError};
use crate::format::format_amount;
use crate::market::{CryptoAsset, Market, DEFAULT_VOLATILITY};
use crate::portfolio::Portfolio;
use crate::store::PortfolioStore;
use crate::tui::{Tab, Theme, TuiOptions};

use clap::{arg, Command};
use colored::Colorize;
use eyre::WrapErr;
use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod format;
mod holding;
mod market;
mod news;
mod portfolio;
mod store;
mod tui;

const APP_NAME: &str = "coinfolio";

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct Config {
    database_path: String,
    currency: String,
    refresh_interval_secs: u64,
    volatility: f64,
    theme: String,
    log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            currency: "USD".to_string(),
            refresh_interval_secs: 5,
            volatility: DEFAULT_VOLATILITY,
            theme: "dark".to_string(),
            log_file: String::new(),
        }
    }
}

impl Config {
    // Empty paths resolve next to the config file
    fn data_dir() -> PathBuf {
        confy::get_configuration_file_path(APP_NAME, "config")
            .ok()
            .and_then(|p| p.parent().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn database_path(&self) -> PathBuf {
        if self.database_path.is_empty() {
            Self::data_dir().join("database")
        } else {
            PathBuf::from(&self.database_path)
        }
    }

    fn log_file(&self) -> PathBuf {
        if self.log_file.is_empty() {
            Self::data_dir().join(format!("{APP_NAME}.log"))
        } else {
            PathBuf::from(&self.log_file)
        }
    }

    fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    fn volatility(&self) -> f64 {
        if self.volatility.is_finite() && self.volatility >= 0.0 {
            self.volatility
        } else {
            DEFAULT_VOLATILITY
        }
    }

    fn theme(&self) -> Theme {
        Theme::from_str(&self.theme).unwrap_or(Theme::Dark)
    }
}

// Logs go to a file so they never garble the dashboard
fn init_logging(cfg: &Config) -> eyre::Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_file = cfg.log_file();
    let log_dir = log_file
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let log_name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| format!("{APP_NAME}.log").into());
    std::fs::create_dir_all(&log_dir)
        .wrap_err_with(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::default()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn cli() -> Command {
    Command::new(APP_NAME)
        .about("Track a crypto portfolio against a simulated market")
        .arg_required_else_help(true)
        .subcommand(Command::new("config").about("Print the path to the config file"))
        .subcommand(Command::new("market").about("Show the current market overview"))
        .subcommand(
            Command::new("add")
                .about("Add an asset to your portfolio")
                .arg(arg!(<ASSET> "Asset id or symbol, e.g. bitcoin or BTC"))
                .arg(arg!(<AMOUNT> "Quantity to add")),
        )
        .subcommand(
            Command::new("set")
                .about("Set the quantity of an asset you hold")
                .arg(arg!(<ASSET> "Asset id or symbol"))
                .arg(arg!(<AMOUNT> "New quantity")),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove an asset from your portfolio")
                .arg(arg!(<ASSET> "Asset id or symbol")),
        )
        .subcommand(Command::new("clear").about("Remove every holding from your portfolio"))
        .subcommand(Command::new("balances").about("Show the holdings of your portfolio"))
        .subcommand(Command::new("allocation").about("Show the allocation of your portfolio"))
        .subcommand(Command::new("summary").about("Show value, 24h change and best performer"))
        .subcommand(Command::new("news").about("Read the latest crypto news"))
        .subcommand(
            Command::new("tui")
                .about("Open the interactive dashboard")
                .arg(
                    arg!(--tab <TAB> "Tab to open: dashboard, portfolio, analytics or news")
                        .required(false),
                ),
        )
}

/// Rehydrate the saved portfolio and price it against the current market.
fn load_portfolio(store: &PortfolioStore, market: &Market) -> Portfolio {
    let mut portfolio = store.load();
    portfolio.apply_prices(market);
    portfolio
}

fn resolve_asset<'a>(
    market: &'a Market,
    query: &str,
) -> Result<&'a CryptoAsset, PortfolioError> {
    market
        .find(query)
        .ok_or_else(|| PortfolioError::UnknownAsset(query.to_string()))
}

fn add_holding(
    portfolio: &mut Portfolio,
    market: &Market,
    query: &str,
    amount: &str,
) -> Result<String, PortfolioError> {
    let asset = resolve_asset(market, query)?;
    let amount = parse_amount(amount)?;
    portfolio.add(asset, amount)?;
    Ok(format!(
        "{} {} added to your portfolio",
        format_amount(amount),
        asset.symbol
    ))
}

fn set_holding(
    portfolio: &mut Portfolio,
    market: &Market,
    query: &str,
    amount: &str,
) -> Result<String, PortfolioError> {
    let asset = resolve_asset(market, query)?;
    let amount = parse_amount(amount)?;
    portfolio.update_amount(&asset.id, amount)?;
    Ok(format!(
        "{} amount has been updated to {}",
        asset.name,
        format_amount(amount)
    ))
}

fn remove_holding(
    portfolio: &mut Portfolio,
    market: &Market,
    query: &str,
) -> Result<String, PortfolioError> {
    let asset = resolve_asset(market, query)?;
    if portfolio.remove(&asset.id) {
        Ok(format!("{} has been removed from your portfolio", asset.name))
    } else {
        Err(PortfolioError::NotHeld(asset.name.clone()))
    }
}

fn parse_tab(value: Option<&str>) -> Result<Option<Tab>, String> {
    match value {
        Some(t) => Tab::from_str(t)
            .map(Some)
            .ok_or_else(|| format!("Unknown tab: '{t}'. Use dashboard, portfolio, analytics or news")),
        None => Ok(None),
    }
}

fn required<'a>(matches: &'a clap::ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cfg: Config = confy::load(APP_NAME, "config").wrap_err("Failed to load config")?;
    let log_guard = init_logging(&cfg)?;

    let matches = cli().get_matches();
    let Some((subcommand, sub_matches)) = matches.subcommand() else {
        return Ok(());
    };
    tracing::info!(command = subcommand, "starting");

    if subcommand == "config" {
        let path = confy::get_configuration_file_path(APP_NAME, "config")
            .wrap_err("Failed to locate config file")?;
        println!("Your config file is located here: \n{}", path.display());
        return Ok(());
    }

    if subcommand == "news" {
        news::print_news();
        return Ok(());
    }

    let market = Market::mock();
    if subcommand == "market" {
        market.print(&cfg.currency);
        return Ok(());
    }

    let db_path = cfg.database_path();
    let store = PortfolioStore::open(&db_path)
        .wrap_err_with(|| format!("Failed to open portfolio store at {}", db_path.display()))?;

    if subcommand == "clear" {
        store.clear().wrap_err("Failed to clear portfolio")?;
        println!("{}", "Your portfolio is now empty".green());
        return Ok(());
    }

    let mut portfolio = load_portfolio(&store, &market);

    let mutation = match subcommand {
        "add" => Some(add_holding(
            &mut portfolio,
            &market,
            required(sub_matches, "ASSET"),
            required(sub_matches, "AMOUNT"),
        )),
        "set" => Some(set_holding(
            &mut portfolio,
            &market,
            required(sub_matches, "ASSET"),
            required(sub_matches, "AMOUNT"),
        )),
        "remove" => Some(remove_holding(
            &mut portfolio,
            &market,
            required(sub_matches, "ASSET"),
        )),
        _ => None,
    };

    if let Some(result) = mutation {
        match result {
            Ok(message) => {
                store.save(&portfolio).wrap_err("Failed to save portfolio")?;
                println!("{}", message.green());
            }
            Err(e) => {
                tracing::warn!(error = %e, "portfolio mutation rejected");
                eprintln!("{}", e.to_string().red());
                drop(log_guard);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    match subcommand {
        "balances" => portfolio.print(&cfg.currency, true),
        "allocation" => {
            if portfolio.is_empty() {
                println!("Your portfolio is empty, nothing to allocate.");
            } else {
                portfolio.draw_pie_chart();
                portfolio.print_allocation(&cfg.currency);
            }
        }
        "summary" => portfolio.print_summary(&cfg.currency),
        "tui" => {
            let tab = match parse_tab(sub_matches.get_one::<String>("tab").map(String::as_str)) {
                Ok(tab) => tab,
                Err(message) => {
                    tracing::warn!(%message, "refusing to open the dashboard");
                    eprintln!("{}", message.red());
                    drop(log_guard);
                    std::process::exit(1);
                }
            };
            let options = TuiOptions {
                currency: cfg.currency.clone(),
                theme: cfg.theme(),
                tab,
                refresh_interval: cfg.refresh_interval(),
                volatility: cfg.volatility(),
            };
            tui::run_tui(market, portfolio, store, options)
                .await
                .map_err(|e| eyre::eyre!("{e}"))?;
        }
        _ => (),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_cli() {
        let matches = cli().get_matches_from(vec![APP_NAME, "add", "btc", "0.5"]);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "add");
        assert_eq!(required(sub, "ASSET"), "btc");
        assert_eq!(required(sub, "AMOUNT"), "0.5");

        let matches = cli().get_matches_from(vec![APP_NAME, "tui", "--tab", "news"]);
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>("tab").map(String::as_str), Some("news"));
    }

    #[test]
    fn test_parse_tab() {
        assert_eq!(parse_tab(None), Ok(None));
        assert_eq!(parse_tab(Some("Analytics")), Ok(Some(Tab::Analytics)));
        let err = parse_tab(Some("charts")).unwrap_err();
        assert!(err.starts_with("Unknown tab: 'charts'"));
    }

    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.currency, "USD");
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(5));
        assert_eq!(cfg.volatility(), DEFAULT_VOLATILITY);
        assert_eq!(cfg.theme(), Theme::Dark);

        let cfg = Config {
            refresh_interval_secs: 0,
            volatility: -1.0,
            theme: "neon".to_string(),
            database_path: "/tmp/folio".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(1));
        assert_eq!(cfg.volatility(), DEFAULT_VOLATILITY);
        assert_eq!(cfg.theme(), Theme::Dark);
        assert_eq!(cfg.database_path(), PathBuf::from("/tmp/folio"));
    }

    #[test]
    fn test_add_set_remove_holding() {
        let market = Market::mock();
        let mut portfolio = Portfolio::new();

        let message = add_holding(&mut portfolio, &market, "BTC", "0.5").unwrap();
        assert_eq!(message, "0.5000 BTC added to your portfolio");
        add_holding(&mut portfolio, &market, "bitcoin", "0.25").unwrap();
        assert!((portfolio.get("bitcoin").unwrap().get_amount() - 0.75).abs() < 1e-12);

        set_holding(&mut portfolio, &market, "btc", "2").unwrap();
        assert_eq!(portfolio.get("bitcoin").unwrap().get_amount(), 2.0);

        assert_eq!(
            set_holding(&mut portfolio, &market, "eth", "1"),
            Err(PortfolioError::NotHeld("ethereum".to_string()))
        );
        assert_eq!(
            add_holding(&mut portfolio, &market, "doge", "1"),
            Err(PortfolioError::UnknownAsset("doge".to_string()))
        );
        assert_eq!(
            add_holding(&mut portfolio, &market, "eth", "-1"),
            Err(PortfolioError::Validation(ValidationError::NonPositiveAmount(-1.0)))
        );

        remove_holding(&mut portfolio, &market, "BTC").unwrap();
        assert!(portfolio.is_empty());
        assert!(remove_holding(&mut portfolio, &market, "BTC").is_err());
    }

    #[test]
    fn test_load_portfolio_reprices_saved_holdings() {
        let dir = tempfile::tempdir().unwrap();
        let store = PortfolioStore::open(dir.path().join("database")).unwrap();

        let mut stale = Market::mock();
        stale.assets[0].price = 1.0;
        let mut portfolio = Portfolio::new();
        portfolio.add(&stale.assets[0], 3.0).unwrap();
        store.save(&portfolio).unwrap();

        let market = Market::mock();
        let loaded = load_portfolio(&store, &market);
        assert!((loaded.get_total_value() - 43567.89 * 3.0).abs() < 1e-6);
    }
}
