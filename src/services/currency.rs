//! Supported currencies and display formatting for emails.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub country: &'static str,
}

pub const CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "USD", symbol: "$", name: "US Dollar", country: "US" },
    CurrencyInfo { code: "EUR", symbol: "€", name: "Euro", country: "EU" },
    CurrencyInfo { code: "GBP", symbol: "£", name: "British Pound", country: "GB" },
    CurrencyInfo { code: "INR", symbol: "₹", name: "Indian Rupee", country: "IN" },
    CurrencyInfo { code: "JPY", symbol: "¥", name: "Japanese Yen", country: "JP" },
    CurrencyInfo { code: "CAD", symbol: "C$", name: "Canadian Dollar", country: "CA" },
    CurrencyInfo { code: "AUD", symbol: "A$", name: "Australian Dollar", country: "AU" },
    CurrencyInfo { code: "CHF", symbol: "CHF", name: "Swiss Franc", country: "CH" },
    CurrencyInfo { code: "CNY", symbol: "¥", name: "Chinese Yuan", country: "CN" },
    CurrencyInfo { code: "KRW", symbol: "₩", name: "Korean Won", country: "KR" },
    CurrencyInfo { code: "BRL", symbol: "R$", name: "Brazilian Real", country: "BR" },
    CurrencyInfo { code: "MXN", symbol: "$", name: "Mexican Peso", country: "MX" },
    CurrencyInfo { code: "RUB", symbol: "₽", name: "Russian Ruble", country: "RU" },
    CurrencyInfo { code: "ZAR", symbol: "R", name: "South African Rand", country: "ZA" },
    CurrencyInfo { code: "SGD", symbol: "S$", name: "Singapore Dollar", country: "SG" },
    CurrencyInfo { code: "HKD", symbol: "HK$", name: "Hong Kong Dollar", country: "HK" },
    CurrencyInfo { code: "NZD", symbol: "NZ$", name: "New Zealand Dollar", country: "NZ" },
    CurrencyInfo { code: "SEK", symbol: "kr", name: "Swedish Krona", country: "SE" },
    CurrencyInfo { code: "NOK", symbol: "kr", name: "Norwegian Krone", country: "NO" },
    CurrencyInfo { code: "DKK", symbol: "kr", name: "Danish Krone", country: "DK" },
    CurrencyInfo { code: "PLN", symbol: "zł", name: "Polish Zloty", country: "PL" },
];

#[must_use]
pub fn currency_info(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.iter().find(|c| c.code == code)
}

#[must_use]
pub fn is_supported(code: &str) -> bool {
    currency_info(code).is_some()
}

/// Display symbol for a currency; unknown codes fall back to "$".
#[must_use]
pub fn currency_symbol(code: &str) -> &'static str {
    currency_info(code).map_or("$", |c| c.symbol)
}

/// Default currency for a country; unknown countries fall back to USD.
#[must_use]
pub fn currency_for_country(country: &str) -> &'static str {
    match country {
        "IN" => "INR",
        "GB" => "GBP",
        "EU" | "DE" | "FR" | "IT" | "ES" => "EUR",
        "JP" => "JPY",
        "CA" => "CAD",
        "AU" => "AUD",
        "CH" => "CHF",
        "CN" => "CNY",
        "KR" => "KRW",
        "BR" => "BRL",
        "MX" => "MXN",
        "RU" => "RUB",
        "ZA" => "ZAR",
        "SG" => "SGD",
        "HK" => "HKD",
        "NZ" => "NZD",
        "SE" => "SEK",
        "NO" => "NOK",
        "DK" => "DKK",
        "PL" => "PLN",
        _ => "USD",
    }
}

/// Format an amount with its currency symbol, e.g. `$1,234.56`.
/// At most two fraction digits; trailing zeros are dropped.
#[must_use]
pub fn format_amount(amount: f64, code: &str) -> String {
    format!("{}{}", currency_symbol(code), format_number(amount))
}

fn format_number(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = (amount.abs() * 100.0).round() / 100.0;

    let mut fixed = format!("{rounded:.2}");
    while fixed.ends_with('0') {
        fixed.pop();
    }
    if fixed.ends_with('.') {
        fixed.pop();
    }

    let (int_part, frac_part) = fixed
        .split_once('.')
        .map_or((fixed.as_str(), None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_symbols() {
        assert_eq!(currency_symbol("USD"), "$");
        assert_eq!(currency_symbol("EUR"), "€");
        assert_eq!(currency_symbol("INR"), "₹");
        assert_eq!(currency_symbol("PLN"), "zł");
    }

    #[test]
    fn unknown_symbol_falls_back_to_dollar() {
        assert_eq!(currency_symbol("XXX"), "$");
    }

    #[test]
    fn table_has_no_duplicates() {
        for (i, a) in CURRENCIES.iter().enumerate() {
            for b in &CURRENCIES[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
        assert_eq!(CURRENCIES.len(), 21);
    }

    #[test]
    fn country_mapping() {
        assert_eq!(currency_for_country("US"), "USD");
        assert_eq!(currency_for_country("DE"), "EUR");
        assert_eq!(currency_for_country("FR"), "EUR");
        assert_eq!(currency_for_country("IN"), "INR");
        assert_eq!(currency_for_country("ZZ"), "USD");
    }

    #[test]
    fn every_mapped_currency_is_supported() {
        for country in [
            "US", "IN", "GB", "EU", "DE", "FR", "IT", "ES", "JP", "CA", "AU", "CH", "CN", "KR",
            "BR", "MX", "RU", "ZA", "SG", "HK", "NZ", "SE", "NO", "DK", "PL",
        ] {
            assert!(is_supported(currency_for_country(country)), "{country}");
        }
    }

    #[test]
    fn formats_with_separators_and_symbol() {
        assert_eq!(format_amount(1_234.56, "USD"), "$1,234.56");
        assert_eq!(format_amount(1_000_000.0, "USD"), "$1,000,000");
        assert_eq!(format_amount(987.0, "EUR"), "€987");
    }

    #[test]
    fn trims_trailing_zeros() {
        assert_eq!(format_amount(0.5, "USD"), "$0.5");
        assert_eq!(format_amount(12.10, "JPY"), "¥12.1");
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(format_amount(999.999, "USD"), "$1,000");
        assert_eq!(format_amount(1.006, "USD"), "$1.01");
    }
}
