use crate::market::CryptoAsset;
use serde::{Deserialize, Serialize};

/// One line of the portfolio: a quantity of an asset plus its current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    asset: CryptoAsset,
    amount: f64,
    #[serde(default)]
    value: f64,
}

impl Holding {
    pub fn new(asset: CryptoAsset, amount: f64) -> Holding {
        let value = asset.price * amount;
        Holding {
            asset,
            amount,
            value,
        }
    }

    pub fn asset(&self) -> &CryptoAsset {
        &self.asset
    }

    pub fn get_id(&self) -> &str {
        &self.asset.id
    }

    pub fn get_name(&self) -> &str {
        &self.asset.name
    }

    pub fn get_symbol(&self) -> &str {
        &self.asset.symbol
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn get_value(&self) -> f64 {
        self.value
    }

    pub fn get_price(&self) -> f64 {
        self.asset.price
    }

    /// Value gained or lost over the last 24h at the current quantity.
    pub fn daily_change(&self) -> f64 {
        self.asset.change_24h * self.amount
    }

    pub fn change_percent_24h(&self) -> f64 {
        self.asset.change_percent_24h
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
        self.revalue();
    }

    // Swap in a newer snapshot of the same asset and revalue
    pub fn reprice(&mut self, asset: CryptoAsset) {
        self.asset = asset;
        self.revalue();
    }

    pub(crate) fn revalue(&mut self) {
        self.value = self.asset.price * self.amount;
    }
}
