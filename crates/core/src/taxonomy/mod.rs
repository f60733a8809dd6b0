mod builtin;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Well-known asset-class ids of the built-in taxonomy.
/// Custom taxonomies may define additional classes; these are the ones the
/// classifier and aggregator treat specially.
pub mod class_ids {
    pub const CASH: &str = "cash";
    pub const TECH_EQUITIES: &str = "tech_equities";
    pub const NON_TECH_EQUITIES: &str = "non_tech_equities";
    pub const CRYPTO: &str = "crypto";
    pub const PRECIOUS_METALS: &str = "precious_metals";
    pub const REAL_ESTATE: &str = "real_estate";
    pub const TECH_OPTIONS: &str = "tech_options";
    pub const DEBT: &str = "debt";
}

/// Well-known sub-asset-class ids of the built-in taxonomy.
pub mod sub_class_ids {
    pub const BITCOIN_ETF: &str = "bitcoin_etf";
    pub const ETHEREUM_ETF: &str = "ethereum_etf";
    pub const CRYPTO_STOCKS: &str = "crypto_stocks";
    pub const TECH_STOCKS: &str = "tech_stocks";
    pub const TECH_ETFS: &str = "tech_etfs";
    pub const TECH_FUNDS: &str = "tech_funds";
    pub const CALLS: &str = "calls";
    pub const PUTS: &str = "puts";
}

/// One sub-asset-class definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAssetClass {
    pub id: String,
    pub name: String,
}

/// One asset-class definition with its ordered sub-classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetClass {
    pub id: String,
    pub name: String,
    pub sub_classes: Vec<SubAssetClass>,
}

impl AssetClass {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sub_classes: Vec::new(),
        }
    }

    pub fn with_sub_classes(mut self, sub_classes: Vec<SubAssetClass>) -> Self {
        self.sub_classes = sub_classes;
        self
    }
}

/// Curated symbol membership sets, consulted by the classifier in a fixed
/// priority order (see `Classifier`). Symbols are stored uppercased.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolSets {
    pub cash_equivalents: HashSet<String>,
    pub bitcoin_etfs: HashSet<String>,
    pub ethereum_etfs: HashSet<String>,
    pub crypto_stocks: HashSet<String>,
    pub crypto_other: HashSet<String>,
    pub precious_metals: HashSet<String>,
    pub real_estate: HashSet<String>,
    pub tech: HashSet<String>,
    pub non_tech: HashSet<String>,
    /// Class-scoped: distinguishes ETFs within `tech_equities`
    pub tech_etfs: HashSet<String>,
    /// Class-scoped: distinguishes funds within `tech_equities`
    pub tech_funds: HashSet<String>,
}

/// Description keyword lists for the heuristic classification tier.
/// Matching is case-insensitive substring search, list order preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordLists {
    pub money_market: Vec<String>,
    pub crypto: Vec<String>,
    pub precious_metals: Vec<String>,
    pub real_estate: Vec<String>,
    pub tech: Vec<String>,
}

/// Immutable asset-class reference data.
///
/// Constructed once and injected wherever classification happens, so tests
/// can substitute fixtures and the curated tables can be versioned
/// independently of code. No module-level mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    classes: Vec<AssetClass>,
    symbols: SymbolSets,
    keywords: KeywordLists,
}

impl Taxonomy {
    /// Build a taxonomy from explicit parts (fixture-friendly).
    /// Symbols in the sets are uppercased on the way in.
    pub fn new(classes: Vec<AssetClass>, mut symbols: SymbolSets, keywords: KeywordLists) -> Self {
        for set in [
            &mut symbols.cash_equivalents,
            &mut symbols.bitcoin_etfs,
            &mut symbols.ethereum_etfs,
            &mut symbols.crypto_stocks,
            &mut symbols.crypto_other,
            &mut symbols.precious_metals,
            &mut symbols.real_estate,
            &mut symbols.tech,
            &mut symbols.non_tech,
            &mut symbols.tech_etfs,
            &mut symbols.tech_funds,
        ] {
            *set = set.iter().map(|s| s.to_uppercase()).collect();
        }
        Self {
            classes,
            symbols,
            keywords,
        }
    }

    /// The curated default taxonomy shipped with the library.
    #[must_use]
    pub fn builtin() -> Self {
        builtin::build()
    }

    /// All asset classes in definition order. The aggregator emits class
    /// summaries in this order, which makes the portfolio view reproducible.
    #[must_use]
    pub fn classes(&self) -> &[AssetClass] {
        &self.classes
    }

    /// Look up an asset class by id.
    #[must_use]
    pub fn class(&self, id: &str) -> Option<&AssetClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Display name for a class id; falls back to the id itself for classes
    /// a fixture taxonomy did not define.
    #[must_use]
    pub fn class_name(&self, id: &str) -> String {
        self.class(id)
            .map_or_else(|| id.to_string(), |c| c.name.clone())
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolSets {
        &self.symbols
    }

    #[must_use]
    pub fn keywords(&self) -> &KeywordLists {
        &self.keywords
    }

    /// Case-insensitive membership test against one of the curated sets.
    #[must_use]
    pub fn set_contains(set: &HashSet<String>, symbol: &str) -> bool {
        set.contains(&symbol.to_uppercase())
    }

    /// Case-insensitive substring match of a description against a keyword
    /// list, in list order.
    #[must_use]
    pub fn matches_keyword(description: &str, keywords: &[String]) -> bool {
        let haystack = description.to_lowercase();
        keywords.iter().any(|k| haystack.contains(&k.to_lowercase()))
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}
