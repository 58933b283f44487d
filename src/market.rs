use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default width of the random price move per tick (±1%).
pub const DEFAULT_VOLATILITY: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoAsset {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    #[serde(rename = "change24h")]
    pub change_24h: f64,
    #[serde(rename = "changePercent24h")]
    pub change_percent_24h: f64,
    pub market_cap: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    pub image: String,
    pub last_updated: DateTime<Utc>,
}

impl CryptoAsset {
    #[allow(clippy::too_many_arguments)]
    fn seed(
        id: &str,
        name: &str,
        symbol: &str,
        image: &str,
        price: f64,
        change_24h: f64,
        change_percent_24h: f64,
        market_cap: f64,
        volume_24h: f64,
    ) -> CryptoAsset {
        CryptoAsset {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            price,
            change_24h,
            change_percent_24h,
            market_cap,
            volume_24h,
            image: image.to_string(),
            last_updated: Utc::now(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.change_percent_24h >= 0.0
    }
}

static MOCK_CATALOG: Lazy<Vec<CryptoAsset>> = Lazy::new(|| {
    vec![
        CryptoAsset::seed(
            "bitcoin", "Bitcoin", "BTC", "₿", 43567.89, 1234.56, 2.92, 853e9, 23.4e9,
        ),
        CryptoAsset::seed(
            "ethereum", "Ethereum", "ETH", "Ξ", 2456.78, -67.23, -2.66, 295e9, 12.3e9,
        ),
        CryptoAsset::seed(
            "cardano", "Cardano", "ADA", "₳", 0.4567, 0.0234, 5.41, 16.2e9, 578e6,
        ),
        CryptoAsset::seed(
            "polkadot", "Polkadot", "DOT", "●", 6.789, -0.345, -4.84, 8.9e9, 234e6,
        ),
        CryptoAsset::seed(
            "chainlink", "Chainlink", "LINK", "⛓", 14.56, 0.78, 5.67, 8.1e9, 456e6,
        ),
    ]
});

/// The simulated market every holding is priced against.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub assets: Vec<CryptoAsset>,
}

impl Default for Market {
    fn default() -> Self {
        Self::mock()
    }
}

impl Market {
    /// Fresh copy of the mock catalog, stamped now.
    pub fn mock() -> Market {
        let now = Utc::now();
        let assets = MOCK_CATALOG
            .iter()
            .cloned()
            .map(|mut asset| {
                asset.last_updated = now;
                asset
            })
            .collect();
        Market { assets }
    }

    /// Move every price by a random fraction in `[-volatility/2, volatility/2)`.
    ///
    /// The 24h change fields are overwritten with the delta of this tick.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, volatility: f64) {
        let now = Utc::now();
        for asset in &mut self.assets {
            let random_change = (rng.gen::<f64>() - 0.5) * volatility;
            let new_price = asset.price * (1.0 + random_change);
            let change_24h = new_price - asset.price;
            asset.change_percent_24h = if asset.price != 0.0 {
                change_24h / asset.price * 100.0
            } else {
                0.0
            };
            asset.change_24h = change_24h;
            asset.price = new_price;
            asset.last_updated = now;
        }
        tracing::debug!(assets = self.assets.len(), volatility, "market ticked");
    }

    /// Restamp every asset without moving prices.
    pub fn refresh(&mut self) {
        let now = Utc::now();
        for asset in &mut self.assets {
            asset.last_updated = now;
        }
    }

    /// Look an asset up by id or symbol, ignoring case.
    pub fn find(&self, query: &str) -> Option<&CryptoAsset> {
        let query = query.trim();
        self.assets.iter().find(|a| {
            a.id.eq_ignore_ascii_case(query) || a.symbol.eq_ignore_ascii_case(query)
        })
    }

    pub fn get(&self, id: &str) -> Option<&CryptoAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.assets.first().map(|a| a.last_updated)
    }

    // Print the market overview as a table
    pub fn print(&self, currency: &str) {
        use crate::format::{format_compact, format_price, format_signed_currency, format_signed_percent};
        use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color as TColor, ContentArrangement, Table};

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(120);

        table.set_header(vec![
            Cell::new("").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Symbol").add_attribute(Attribute::Bold),
            Cell::new("Price").add_attribute(Attribute::Bold),
            Cell::new("24h Change").add_attribute(Attribute::Bold),
            Cell::new("%24h").add_attribute(Attribute::Bold),
            Cell::new("Market Cap").add_attribute(Attribute::Bold),
            Cell::new("Volume").add_attribute(Attribute::Bold),
        ]);

        for asset in &self.assets {
            let c = if asset.is_up() { TColor::Green } else { TColor::Red };
            table.add_row(vec![
                Cell::new(&asset.image),
                Cell::new(&asset.name),
                Cell::new(&asset.symbol).fg(TColor::DarkYellow),
                Cell::new(format_price(asset.price, currency)).set_alignment(CellAlignment::Right),
                Cell::new(format_signed_currency(asset.change_24h, currency))
                    .set_alignment(CellAlignment::Right)
                    .fg(c),
                Cell::new(format_signed_percent(asset.change_percent_24h))
                    .set_alignment(CellAlignment::Right)
                    .fg(c),
                Cell::new(format_compact(asset.market_cap, currency)).set_alignment(CellAlignment::Right),
                Cell::new(format_compact(asset.volume_24h, currency)).set_alignment(CellAlignment::Right),
            ]);
        }

        println!("{table}");
        if let Some(updated) = self.last_updated() {
            let local = updated.with_timezone(&chrono::Local);
            println!("Last updated: {}", local.format("%H:%M:%S"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mock_catalog() {
        let market = Market::mock();
        let symbols: Vec<&str> = market.assets.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTC", "ETH", "ADA", "DOT", "LINK"]);
        assert_eq!(market.get("bitcoin").map(|a| a.price), Some(43567.89));
    }

    #[test]
    fn test_find_by_id_or_symbol() {
        let market = Market::mock();
        assert_eq!(market.find("ETH").map(|a| a.id.as_str()), Some("ethereum"));
        assert_eq!(market.find("eth").map(|a| a.id.as_str()), Some("ethereum"));
        assert_eq!(market.find("Cardano").map(|a| a.id.as_str()), Some("cardano"));
        assert!(market.find("doge").is_none());
    }

    #[test]
    fn test_tick_stays_within_volatility() {
        let mut market = Market::mock();
        let before = market.clone();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let previous = market.clone();
            market.tick(&mut rng, DEFAULT_VOLATILITY);
            for (old, new) in previous.assets.iter().zip(&market.assets) {
                let ratio = new.price / old.price;
                assert!((0.99..=1.01).contains(&ratio), "ratio out of range: {ratio}");
                assert!((new.change_24h - (new.price - old.price)).abs() < 1e-9);
                let pct = new.change_24h / old.price * 100.0;
                assert!((new.change_percent_24h - pct).abs() < 1e-9);
            }
        }
        assert_ne!(before.assets[0].price, market.assets[0].price);
    }

    #[test]
    fn test_tick_with_zero_volatility_keeps_prices() {
        let mut market = Market::mock();
        let before = market.clone();
        market.tick(&mut StdRng::seed_from_u64(1), 0.0);
        for (old, new) in before.assets.iter().zip(&market.assets) {
            assert_eq!(old.price, new.price);
            assert_eq!(new.change_24h, 0.0);
            assert_eq!(new.change_percent_24h, 0.0);
        }
    }

    #[test]
    fn test_refresh_keeps_prices() {
        let mut market = Market::mock();
        let before = market.clone();
        market.refresh();
        for (old, new) in before.assets.iter().zip(&market.assets) {
            assert_eq!(old.price, new.price);
            assert_eq!(old.change_24h, new.change_24h);
            assert!(new.last_updated >= old.last_updated);
        }
    }

    #[test]
    fn test_asset_serializes_camel_case() {
        let market = Market::mock();
        let json = serde_json::to_value(&market.assets[0]).unwrap();
        assert!(json.get("change24h").is_some());
        assert!(json.get("changePercent24h").is_some());
        assert!(json.get("marketCap").is_some());
        assert!(json.get("volume24h").is_some());
        assert!(json.get("lastUpdated").is_some());
    }
}
