use crate::error::{validate_amount, PortfolioError};
use crate::format::{format_amount, format_currency, format_price, format_signed_currency, format_signed_percent};
use crate::holding::Holding;
use crate::market::{CryptoAsset, Market};
use piechart::{Chart, Color};
use serde::{Deserialize, Serialize};

/// Share of the portfolio held in one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSlice {
    pub symbol: String,
    pub value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Portfolio {
        Portfolio {
            holdings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    #[cfg(test)]
    pub fn get(&self, asset_id: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.get_id() == asset_id)
    }

    /// Add `amount` of `asset`, merging into an existing holding of the same asset.
    pub fn add(&mut self, asset: &CryptoAsset, amount: f64) -> Result<(), PortfolioError> {
        let amount = validate_amount(amount)?;

        if let Some(holding) = self.holdings.iter_mut().find(|h| h.get_id() == asset.id) {
            let new_amount = holding.get_amount() + amount;
            holding.reprice(asset.clone());
            holding.set_amount(new_amount);
        } else {
            self.holdings.push(Holding::new(asset.clone(), amount));
        }
        tracing::info!(asset = %asset.id, amount, "added to portfolio");
        Ok(())
    }

    /// Drop the holding for `asset_id`. Returns whether anything was removed.
    pub fn remove(&mut self, asset_id: &str) -> bool {
        let before = self.holdings.len();
        self.holdings.retain(|h| h.get_id() != asset_id);
        let removed = self.holdings.len() != before;
        if removed {
            tracing::info!(asset = %asset_id, "removed from portfolio");
        }
        removed
    }

    pub fn update_amount(&mut self, asset_id: &str, amount: f64) -> Result<(), PortfolioError> {
        let amount = validate_amount(amount)?;
        let holding = self
            .holdings
            .iter_mut()
            .find(|h| h.get_id() == asset_id)
            .ok_or_else(|| PortfolioError::NotHeld(asset_id.to_string()))?;
        holding.set_amount(amount);
        tracing::info!(asset = %asset_id, amount, "updated holding amount");
        Ok(())
    }

    /// Re-point every holding at the market's current snapshot of its asset.
    ///
    /// Holdings whose asset is not listed keep their last known snapshot.
    pub fn apply_prices(&mut self, market: &Market) {
        for holding in &mut self.holdings {
            match market.get(holding.get_id()) {
                Some(asset) => holding.reprice(asset.clone()),
                None => holding.revalue(),
            }
        }
    }

    pub fn get_total_value(&self) -> f64 {
        self.holdings.iter().map(Holding::get_value).sum()
    }

    /// Value gained or lost over the last 24h across all holdings.
    pub fn get_total_change(&self) -> f64 {
        self.holdings.iter().map(Holding::daily_change).sum()
    }

    /// 24h change relative to the value 24h ago.
    pub fn get_total_change_percent(&self) -> f64 {
        let value = self.get_total_value();
        if value <= 0.0 {
            return 0.0;
        }
        let change = self.get_total_change();
        let previous = value - change;
        if previous <= 0.0 {
            return 0.0;
        }
        change / previous * 100.0
    }

    pub fn get_allocation(&self) -> Vec<AllocationSlice> {
        let total_value = self.get_total_value();

        self.holdings
            .iter()
            .map(|h| AllocationSlice {
                symbol: h.get_symbol().to_string(),
                value: h.get_value(),
                percentage: if total_value > 0.0 {
                    h.get_value() / total_value * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// Holding with the strongest 24h move; the first one wins ties.
    pub fn best_performer(&self) -> Option<&Holding> {
        self.holdings.iter().fold(None, |best: Option<&Holding>, current| match best {
            Some(b) if current.change_percent_24h() <= b.change_percent_24h() => Some(b),
            _ => Some(current),
        })
    }

    // Print the portfolio as a table
    pub fn print(&self, currency: &str, include_sum: bool) {
        use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color as TColor, ContentArrangement, Table};

        if self.is_empty() {
            println!("Your portfolio is empty. Add assets with `coinfolio add <ASSET> <AMOUNT>`.");
            return;
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(120);

        table.set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Symbol").add_attribute(Attribute::Bold),
            Cell::new("Amount").add_attribute(Attribute::Bold),
            Cell::new("Price").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
            Cell::new("%24h").add_attribute(Attribute::Bold),
            Cell::new("Daily P&L").add_attribute(Attribute::Bold),
        ]);

        for holding in &self.holdings {
            let pct = holding.change_percent_24h();
            let pnl = holding.daily_change();
            let pct_color = if pct >= 0.0 { TColor::Green } else { TColor::Red };
            let pnl_color = if pnl >= 0.0 { TColor::Green } else { TColor::Red };

            table.add_row(vec![
                Cell::new(format!("{} {}", holding.asset().image, holding.get_name())),
                Cell::new(holding.get_symbol()).fg(TColor::DarkYellow),
                Cell::new(format_amount(holding.get_amount())).set_alignment(CellAlignment::Right),
                Cell::new(format_price(holding.get_price(), currency)).set_alignment(CellAlignment::Right),
                Cell::new(format_currency(holding.get_value(), currency)).set_alignment(CellAlignment::Right),
                Cell::new(format_signed_percent(pct)).set_alignment(CellAlignment::Right).fg(pct_color),
                Cell::new(format_signed_currency(pnl, currency)).set_alignment(CellAlignment::Right).fg(pnl_color),
            ]);
        }

        if include_sum {
            let total_change = self.get_total_change();
            let c = if total_change >= 0.0 { TColor::Green } else { TColor::Red };
            table.add_row(vec![
                Cell::new("TOTAL").add_attribute(Attribute::Bold),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new(format_currency(self.get_total_value(), currency))
                    .set_alignment(CellAlignment::Right)
                    .add_attribute(Attribute::Bold),
                Cell::new(format_signed_percent(self.get_total_change_percent()))
                    .set_alignment(CellAlignment::Right)
                    .add_attribute(Attribute::Bold)
                    .fg(c),
                Cell::new(format_signed_currency(total_change, currency))
                    .set_alignment(CellAlignment::Right)
                    .add_attribute(Attribute::Bold)
                    .fg(c),
            ]);
        }

        println!("{table}");
    }

    // Print the summary cards: value, 24h change, best performer, holdings
    pub fn print_summary(&self, currency: &str) {
        use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color as TColor, ContentArrangement, Table};

        let change = self.get_total_change();
        let c = if change >= 0.0 { TColor::Green } else { TColor::Red };

        let mut summary = Table::new();
        summary
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(120)
            .set_header(vec![
                Cell::new("Total Value").add_attribute(Attribute::Bold),
                Cell::new("24h Change").add_attribute(Attribute::Bold),
                Cell::new("%24h").add_attribute(Attribute::Bold),
                Cell::new("Best Performer").add_attribute(Attribute::Bold),
                Cell::new("Holdings").add_attribute(Attribute::Bold),
            ]);

        let best = match self.best_performer() {
            Some(h) => Cell::new(format!(
                "{} {}",
                h.get_symbol(),
                format_signed_percent(h.change_percent_24h())
            ))
            .fg(if h.change_percent_24h() >= 0.0 { TColor::Green } else { TColor::Red }),
            None => Cell::new("--"),
        };

        summary.add_row(vec![
            Cell::new(format_currency(self.get_total_value(), currency)).set_alignment(CellAlignment::Right),
            Cell::new(format_signed_currency(change, currency)).set_alignment(CellAlignment::Right).fg(c),
            Cell::new(format_signed_percent(self.get_total_change_percent())).set_alignment(CellAlignment::Right).fg(c),
            best,
            Cell::new(format!("{} assets", self.len())).set_alignment(CellAlignment::Right),
        ]);

        println!("{summary}");
    }

    // Print the allocation in descending order %-wise
    pub fn print_allocation(&self, currency: &str) {
        let mut allocation = self.get_allocation();
        allocation.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        println!("================================================");
        for slice in allocation {
            println!(
                "{: >8} | {: >16} | {: >9.2}%",
                slice.symbol,
                format_currency(slice.value, currency),
                slice.percentage
            );
        }
    }

    pub fn draw_pie_chart(&self) {
        let colors = [
            Color::Red,
            Color::Green,
            Color::Blue,
            Color::Yellow,
            Color::Cyan,
            Color::White,
            Color::Purple,
            Color::Black,
        ];

        let data: Vec<piechart::Data> = self
            .holdings
            .iter()
            .enumerate()
            .map(|(i, holding)| piechart::Data {
                label: holding.get_symbol().to_string(),
                value: holding.get_value() as f32,
                color: Some(colors[i % colors.len()].into()),
                fill: '•',
            })
            .collect();

        Chart::new()
            .legend(true)
            .radius(9)
            .aspect_ratio(3)
            .draw(&data);
    }
}
