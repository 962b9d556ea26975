//! Region name -> related market symbols.

/// Lookup table, checked in order. The first key contained in the region name
/// wins, so "Juba, South Sudan" resolves through "Sudan".
pub const REGION_SYMBOLS: &[(&str, [&str; 3])] = &[
    ("Iraq", ["USO", "XLE", "KSA"]),
    ("Syria", ["USO", "XLE", "EZA"]),
    ("Jerusalem", ["EIS", "ITEQ", "USO"]),
    ("Yemen", ["USO", "XLE", "KSA"]),
    ("Ukraine", ["RSX", "ERUS", "WEAT"]),
    ("Somalia", ["EZA", "FM", "USO"]),
    ("Sudan", ["EZA", "FM", "GLD"]),
    ("China", ["FXI", "BABA", "KWEB"]),
    ("Taiwan", ["EWT", "TSM", "INDA"]),
    ("USA", ["SPY", "DIA", "QQQ"]),
    ("Mexico", ["EWW", "MXF", "FMX"]),
    ("Venezuela", ["USO", "XLE", "ILF"]),
    ("Afghanistan", ["USO", "XLE", "FM"]),
    ("Myanmar", ["EWS", "FM", "ASEA"]),
    ("Colombia", ["GXG", "ILF", "EC"]),
    ("DRC", ["EZA", "FM", "GLD"]),
    ("Burkina Faso", ["EZA", "FM", "GLD"]),
    ("South Sudan", ["EZA", "FM", "USO"]),
];

pub const DEFAULT_SYMBOLS: [&str; 3] = ["SPY", "VIX", "GLD"];

pub fn market_symbols_for_region(region_name: &str) -> [&'static str; 3] {
    REGION_SYMBOLS
        .iter()
        .find(|(key, _)| region_name.contains(key))
        .map(|(_, symbols)| *symbols)
        .unwrap_or(DEFAULT_SYMBOLS)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SYMBOLS, market_symbols_for_region};

    #[test]
    fn matches_by_substring() {
        assert_eq!(
            market_symbols_for_region("Kyiv, Ukraine"),
            ["RSX", "ERUS", "WEAT"]
        );
        assert_eq!(market_symbols_for_region("Jerusalem"), ["EIS", "ITEQ", "USO"]);
    }

    #[test]
    fn earlier_keys_shadow_later_ones() {
        assert_eq!(
            market_symbols_for_region("Juba, South Sudan"),
            ["EZA", "FM", "GLD"]
        );
    }

    #[test]
    fn falls_back_to_default_triple() {
        assert_eq!(market_symbols_for_region("Reykjavik"), DEFAULT_SYMBOLS);
        assert_eq!(market_symbols_for_region(""), DEFAULT_SYMBOLS);
    }

    #[test]
    fn match_is_case_sensitive() {
        assert_eq!(market_symbols_for_region("ukraine"), DEFAULT_SYMBOLS);
    }
}
