//! Configuration loading and representation.

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use invoicepad_render::{DEFAULT_ROWS_PER_PAGE, LayoutConfig};

pub const ENV_DATA_DIR: &str = "INVOICEPAD_DATA_DIR";
pub const ENV_DEFAULT_TAX_RATE: &str = "INVOICEPAD_DEFAULT_TAX_RATE";
pub const ENV_ROWS_PER_PAGE: &str = "INVOICEPAD_ROWS_PER_PAGE";
pub const ENV_FONT_REGULAR: &str = "INVOICEPAD_FONT_REGULAR";
pub const ENV_FONT_BOLD: &str = "INVOICEPAD_FONT_BOLD";

/// Tax rate a fresh or reset draft starts with.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Where settings are persisted; `None` keeps them in memory.
    pub data_dir: Option<PathBuf>,
    pub default_tax_rate: Decimal,
    pub rows_per_page: usize,
    /// Font files for PDF output; `None` looks up an installed sans font.
    pub font_regular: Option<PathBuf>,
    pub font_bold: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_tax_rate: DEFAULT_TAX_RATE,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            font_regular: None,
            font_bold: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = path_var(&lookup, ENV_DATA_DIR);

        let default_tax_rate = parse_or(&lookup, ENV_DEFAULT_TAX_RATE, defaults.default_tax_rate, |rate| {
            *rate >= Decimal::ZERO
        });

        let max_rows = LayoutConfig::default().max_rows_per_page();
        let rows_per_page = parse_or(&lookup, ENV_ROWS_PER_PAGE, defaults.rows_per_page, |rows| {
            (1..=max_rows).contains(rows)
        });

        Self {
            data_dir,
            default_tax_rate,
            rows_per_page,
            font_regular: path_var(&lookup, ENV_FONT_REGULAR),
            font_bold: path_var(&lookup, ENV_FONT_BOLD),
        }
    }
}

fn path_var<F>(lookup: &F, name: &str) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T, accept: impl Fn(&T) -> bool) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + core::fmt::Display,
{
    let Some(raw) = lookup(name) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if accept(&value) => value,
        _ => {
            tracing::warn!(var = name, value = %raw, fallback = %default, "ignoring invalid configuration value");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn unset_variables_use_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.default_tax_rate, dec!(18));
        assert_eq!(cfg.rows_per_page, 14);
    }

    #[test]
    fn values_are_read() {
        let cfg = config(&[
            (ENV_DATA_DIR, "/tmp/invoicepad"),
            (ENV_DEFAULT_TAX_RATE, "12.5"),
            (ENV_ROWS_PER_PAGE, "10"),
            (ENV_FONT_REGULAR, "/usr/share/fonts/sans.ttf"),
            (ENV_FONT_BOLD, " "),
        ]);
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/tmp/invoicepad")));
        assert_eq!(cfg.default_tax_rate, dec!(12.5));
        assert_eq!(cfg.rows_per_page, 10);
        assert_eq!(cfg.font_regular, Some(PathBuf::from("/usr/share/fonts/sans.ttf")));
        assert_eq!(cfg.font_bold, None);
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = config(&[
            (ENV_DATA_DIR, "   "),
            (ENV_DEFAULT_TAX_RATE, "-1"),
            (ENV_ROWS_PER_PAGE, "zero"),
        ]);
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn rows_per_page_must_fit_the_page() {
        let max = LayoutConfig::default().max_rows_per_page();
        assert_eq!(config(&[(ENV_ROWS_PER_PAGE, &max.to_string())]).rows_per_page, max);

        for too_many in [max + 1, 30, 1000] {
            let cfg = config(&[(ENV_ROWS_PER_PAGE, &too_many.to_string())]);
            assert_eq!(cfg.rows_per_page, DEFAULT_ROWS_PER_PAGE);
        }
        assert_eq!(config(&[(ENV_ROWS_PER_PAGE, "0")]).rows_per_page, DEFAULT_ROWS_PER_PAGE);
    }
}
