use crate::error::StoreError;
use crate::portfolio::Portfolio;
use crate::error::validate_amount;
use std::collections::HashSet;
use std::path::Path;

/// Key of the single slot the portfolio lives in.
pub const PORTFOLIO_KEY: &str = "crypto-portfolio";

/// Local key-value persistence for the portfolio.
///
/// The whole holding list is written to one slot as JSON on every mutation.
#[derive(Clone)]
pub struct PortfolioStore {
    db: sled::Db,
}

impl PortfolioStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<PortfolioStore, StoreError> {
        let db = sled::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "opened portfolio store");
        Ok(PortfolioStore { db })
    }

    /// In-memory store that vanishes when dropped.
    #[cfg(test)]
    pub fn temporary() -> Result<PortfolioStore, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(PortfolioStore { db })
    }

    /// Rehydrate the portfolio, starting empty when the slot is missing or corrupt.
    pub fn load(&self) -> Portfolio {
        let bytes = match self.db.get(PORTFOLIO_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::info!("no saved portfolio, starting empty");
                return Portfolio::new();
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read saved portfolio, starting empty");
                return Portfolio::new();
            }
        };

        match serde_json::from_slice::<Portfolio>(&bytes) {
            Ok(mut portfolio) => {
                // Drop holdings that add/update_amount could never have produced
                let mut seen = HashSet::new();
                portfolio.holdings.retain(|holding| {
                    let valid = validate_amount(holding.get_amount()).is_ok();
                    let fresh = seen.insert(holding.get_id().to_string());
                    if !valid || !fresh {
                        tracing::warn!(
                            asset = holding.get_id(),
                            amount = holding.get_amount(),
                            duplicate = !fresh,
                            "dropping invalid saved holding"
                        );
                    }
                    valid && fresh
                });
                for holding in &mut portfolio.holdings {
                    holding.revalue();
                }
                tracing::info!(holdings = portfolio.len(), "loaded saved portfolio");
                portfolio
            }
            Err(e) => {
                tracing::warn!(error = %e, "saved portfolio is corrupt, starting empty");
                Portfolio::new()
            }
        }
    }

    pub fn save(&self, portfolio: &Portfolio) -> Result<(), StoreError> {
        let json = serde_json::to_vec(portfolio)?;
        self.db.insert(PORTFOLIO_KEY, json)?;

        // block until all operations are stable on disk
        self.db.flush()?;
        tracing::debug!(holdings = portfolio.len(), "saved portfolio");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.db.remove(PORTFOLIO_KEY)?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Market;

    #[test]
    fn test_missing_slot_loads_empty() {
        let store = PortfolioStore::temporary().unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("cardano").unwrap(), 1000.0).unwrap();
        portfolio.add(market.get("bitcoin").unwrap(), 0.1).unwrap();

        let store = PortfolioStore::temporary().unwrap();
        store.save(&portfolio).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, portfolio);
        assert_eq!(loaded.holdings[0].get_id(), "cardano");
    }

    #[test]
    fn test_corrupt_slot_loads_empty() {
        let store = PortfolioStore::temporary().unwrap();
        store.db.insert(PORTFOLIO_KEY, &b"{not json"[..]).unwrap();
        assert!(store.load().is_empty());

        store.db.insert(PORTFOLIO_KEY, &br#"{"amount": 1}"#[..]).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_recomputes_values() {
        let store = PortfolioStore::temporary().unwrap();
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("polkadot").unwrap(), 2.0).unwrap();

        let mut json = serde_json::to_value(&portfolio).unwrap();
        json[0]["value"] = serde_json::json!(999999.0);
        store
            .db
            .insert(PORTFOLIO_KEY, serde_json::to_vec(&json).unwrap())
            .unwrap();

        let loaded = store.load();
        assert!((loaded.get_total_value() - 6.789 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_drops_invalid_holdings() {
        let store = PortfolioStore::temporary().unwrap();
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("bitcoin").unwrap(), 1.0).unwrap();
        portfolio.add(market.get("ethereum").unwrap(), 2.0).unwrap();
        portfolio.add(market.get("cardano").unwrap(), 3.0).unwrap();

        let mut json = serde_json::to_value(&portfolio).unwrap();
        json[1]["amount"] = serde_json::json!(0.0);
        json[2]["amount"] = serde_json::json!(-3.0);
        let duplicate = json[0].clone();
        json.as_array_mut().unwrap().push(duplicate);
        store
            .db
            .insert(PORTFOLIO_KEY, serde_json::to_vec(&json).unwrap())
            .unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.holdings[0].get_id(), "bitcoin");
        assert_eq!(loaded.holdings[0].get_amount(), 1.0);
    }

    #[test]
    fn test_clear() {
        let market = Market::mock();
        let mut portfolio = Portfolio::new();
        portfolio.add(market.get("ethereum").unwrap(), 1.0).unwrap();

        let store = PortfolioStore::temporary().unwrap();
        store.save(&portfolio).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_empty());
    }
}
