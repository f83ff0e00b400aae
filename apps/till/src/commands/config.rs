//! # Config Commands
//!
//! Read-only store information and the menu, fetched once at UI startup.

use serde::Serialize;
use tableside_core::Product;
use tracing::debug;

use crate::catalog::Catalog;
use crate::state::TillConfig;

/// What the UI needs to render headers and format amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    pub store_name: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub tax_rate_bps: u32,
    /// For display only.
    pub tax_percentage: f64,
}

/// Gets the store configuration.
pub fn get_store_info(config: &TillConfig) -> StoreInfo {
    debug!("get_store_info command");
    StoreInfo {
        store_name: config.store_name().to_string(),
        currency_symbol: config.currency.symbol.clone(),
        currency_decimals: config.currency.decimals,
        tax_rate_bps: config.tax_rate().bps(),
        tax_percentage: config.tax_rate().percentage(),
    }
}

/// Lists the menu in catalog order.
pub fn get_menu<C: Catalog>(catalog: &C) -> Vec<Product> {
    debug!("get_menu command");
    catalog.products().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{config, menu};

    #[test]
    fn test_store_info() {
        let info = get_store_info(&config());
        assert_eq!(info.store_name, "Tableside");
        assert_eq!(info.tax_rate_bps, 500);
        assert_eq!(info.tax_percentage, 5.0);
        assert_eq!(info.currency_decimals, 2);
    }

    #[test]
    fn test_menu_order() {
        let products = get_menu(&menu());
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p-1", "p-2"]);
    }
}
