use crate::models::classified::Classification;
use crate::models::position::InstrumentType;
use crate::taxonomy::{class_ids, sub_class_ids, Taxonomy};

/// One tier of the classification cascade.
///
/// The resolution order is a design decision, not incidental: the rules run
/// in the order of [`Classifier::RULES`], first match wins. Keeping the
/// sequence enumerable makes the precedence itself a testable artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    /// Options are classified by their derived underlying symbol
    OptionUnderlying,
    /// Exact membership in the curated symbol sets, in fixed set priority
    CuratedSymbol,
    /// Case-insensitive description keyword heuristics
    DescriptionKeyword,
    /// Mutual funds / collective investments default to non-tech equities
    InstrumentTypeFallback,
    /// Everything else is a non-tech equity
    DefaultEquity,
}

impl std::fmt::Display for ClassificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassificationRule::OptionUnderlying => write!(f, "option_underlying"),
            ClassificationRule::CuratedSymbol => write!(f, "curated_symbol"),
            ClassificationRule::DescriptionKeyword => write!(f, "description_keyword"),
            ClassificationRule::InstrumentTypeFallback => write!(f, "instrument_type_fallback"),
            ClassificationRule::DefaultEquity => write!(f, "default_equity"),
        }
    }
}

/// Assigns every position an asset class and optional sub-class from the
/// taxonomy.
///
/// Pure and deterministic — no I/O, no state. Identical inputs always
/// produce identical classifications, which the reproducibility of the
/// portfolio view depends on.
pub struct Classifier;

impl Classifier {
    /// The full cascade, in resolution order. First matching rule wins.
    pub const RULES: [ClassificationRule; 5] = [
        ClassificationRule::OptionUnderlying,
        ClassificationRule::CuratedSymbol,
        ClassificationRule::DescriptionKeyword,
        ClassificationRule::InstrumentTypeFallback,
        ClassificationRule::DefaultEquity,
    ];

    pub fn new() -> Self {
        Self
    }

    /// Classify one position into an asset class, with the class-scoped
    /// sub-classification second pass applied to the result.
    #[must_use]
    pub fn classify(
        &self,
        taxonomy: &Taxonomy,
        symbol: &str,
        instrument_type: InstrumentType,
        description: Option<&str>,
    ) -> Classification {
        for rule in Self::RULES {
            if let Some(mut classification) =
                self.apply_rule(rule, taxonomy, symbol, instrument_type, description)
            {
                // Options carry their own sub-classification from the rule;
                // everything else gets the class-scoped second pass.
                if classification.sub_class_id.is_none() {
                    let (sub_class_id, sub_category_label) = self.sub_classify(
                        taxonomy,
                        &classification.asset_class_id,
                        symbol,
                        instrument_type,
                    );
                    classification.sub_class_id = sub_class_id;
                    if classification.sub_category_label.is_none() {
                        classification.sub_category_label = sub_category_label;
                    }
                }
                return classification;
            }
        }
        // Unreachable: DefaultEquity always matches. Kept total anyway.
        Classification::class(class_ids::NON_TECH_EQUITIES)
    }

    /// Apply a single rule of the cascade. Public so the precedence can be
    /// exercised tier by tier in tests.
    #[must_use]
    pub fn apply_rule(
        &self,
        rule: ClassificationRule,
        taxonomy: &Taxonomy,
        symbol: &str,
        instrument_type: InstrumentType,
        description: Option<&str>,
    ) -> Option<Classification> {
        match rule {
            ClassificationRule::OptionUnderlying => {
                self.classify_option(taxonomy, symbol, instrument_type, description)
            }
            ClassificationRule::CuratedSymbol => self.classify_curated(taxonomy, symbol),
            ClassificationRule::DescriptionKeyword => {
                self.classify_by_keywords(taxonomy, description?)
            }
            ClassificationRule::InstrumentTypeFallback => instrument_type
                .is_fund()
                .then(|| Classification::class(class_ids::NON_TECH_EQUITIES)),
            ClassificationRule::DefaultEquity => {
                Some(Classification::class(class_ids::NON_TECH_EQUITIES))
            }
        }
    }

    // ── Rule tiers ──────────────────────────────────────────────────

    /// Tier 1: options. The underlying symbol is derived by stripping the
    /// trailing date/strike/call-put suffix, and classification follows the
    /// underlying. All options land in `tech_options` regardless of the
    /// underlying's class — the taxonomy has no generic options class, a
    /// known upstream simplification preserved for parity.
    fn classify_option(
        &self,
        _taxonomy: &Taxonomy,
        symbol: &str,
        instrument_type: InstrumentType,
        description: Option<&str>,
    ) -> Option<Classification> {
        if instrument_type != InstrumentType::Option {
            return None;
        }
        let underlying = option_underlying(symbol);
        let label = if underlying.is_empty() {
            "Option".to_string()
        } else {
            format!("{underlying} Option")
        };
        // Put/call detection is a crude substring heuristic carried over
        // from the original: description "PUT" first, then the last letter
        // of the contract suffix. See DESIGN.md.
        let sub_class = if is_put(symbol, &underlying, description) {
            sub_class_ids::PUTS
        } else {
            sub_class_ids::CALLS
        };
        Some(Classification {
            asset_class_id: class_ids::TECH_OPTIONS.to_string(),
            sub_class_id: Some(sub_class.to_string()),
            sub_category_label: Some(label),
        })
    }

    /// Tier 2: exact symbol membership. The set order is fixed so that a
    /// symbol appearing in two sets resolves the same way every time
    /// (crypto beats tech, etc.).
    fn classify_curated(&self, taxonomy: &Taxonomy, symbol: &str) -> Option<Classification> {
        let sets = taxonomy.symbols();
        let tiers: [(&std::collections::HashSet<String>, &str); 9] = [
            (&sets.cash_equivalents, class_ids::CASH),
            (&sets.bitcoin_etfs, class_ids::CRYPTO),
            (&sets.ethereum_etfs, class_ids::CRYPTO),
            (&sets.crypto_stocks, class_ids::CRYPTO),
            (&sets.crypto_other, class_ids::CRYPTO),
            (&sets.precious_metals, class_ids::PRECIOUS_METALS),
            (&sets.real_estate, class_ids::REAL_ESTATE),
            (&sets.tech, class_ids::TECH_EQUITIES),
            (&sets.non_tech, class_ids::NON_TECH_EQUITIES),
        ];
        tiers
            .iter()
            .find(|(set, _)| Taxonomy::set_contains(set, symbol))
            .map(|(_, class_id)| Classification::class(*class_id))
    }

    /// Tier 3: description keywords, case-insensitive substring match.
    fn classify_by_keywords(
        &self,
        taxonomy: &Taxonomy,
        description: &str,
    ) -> Option<Classification> {
        let kw = taxonomy.keywords();
        let tiers: [(&[String], &str); 5] = [
            (&kw.money_market, class_ids::CASH),
            (&kw.crypto, class_ids::CRYPTO),
            (&kw.precious_metals, class_ids::PRECIOUS_METALS),
            (&kw.real_estate, class_ids::REAL_ESTATE),
            (&kw.tech, class_ids::TECH_EQUITIES),
        ];
        tiers
            .iter()
            .find(|(keywords, _)| Taxonomy::matches_keyword(description, keywords))
            .map(|(_, class_id)| Classification::class(*class_id))
    }

    // ── Sub-classification (second pass) ────────────────────────────

    /// Class-scoped sub-classification, applied only once a parent class is
    /// assigned. Returns `(sub_class_id, sub_category_label)`.
    fn sub_classify(
        &self,
        taxonomy: &Taxonomy,
        class_id: &str,
        symbol: &str,
        instrument_type: InstrumentType,
    ) -> (Option<String>, Option<String>) {
        let sets = taxonomy.symbols();
        let found = match class_id {
            class_ids::CRYPTO => {
                if Taxonomy::set_contains(&sets.bitcoin_etfs, symbol) {
                    Some((sub_class_ids::BITCOIN_ETF, "Bitcoin ETF"))
                } else if Taxonomy::set_contains(&sets.ethereum_etfs, symbol) {
                    Some((sub_class_ids::ETHEREUM_ETF, "Ethereum ETF"))
                } else if Taxonomy::set_contains(&sets.crypto_stocks, symbol) {
                    Some((sub_class_ids::CRYPTO_STOCKS, "Crypto Stock"))
                } else {
                    None
                }
            }
            class_ids::TECH_EQUITIES => {
                if instrument_type == InstrumentType::Etf
                    || Taxonomy::set_contains(&sets.tech_etfs, symbol)
                {
                    Some((sub_class_ids::TECH_ETFS, "Tech ETF"))
                } else if instrument_type.is_fund()
                    || Taxonomy::set_contains(&sets.tech_funds, symbol)
                {
                    Some((sub_class_ids::TECH_FUNDS, "Tech Fund"))
                } else {
                    Some((sub_class_ids::TECH_STOCKS, "Tech Stock"))
                }
            }
            _ => None,
        };
        match found {
            Some((id, label)) => (Some(id.to_string()), Some(label.to_string())),
            None => (None, None),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the underlying ticker from an option symbol by stripping the
/// trailing date/strike/call-put suffix: the underlying is the leading run
/// of letters (and '.') before the first digit, space, or underscore.
/// "AAPL  240621C00190000" → "AAPL", "TSLA240119P00200000" → "TSLA".
#[must_use]
pub fn option_underlying(symbol: &str) -> String {
    symbol
        .chars()
        .take_while(|c| c.is_ascii_alphabetic() || *c == '.')
        .collect::<String>()
        .to_uppercase()
}

/// Crude put/call heuristic preserved from the original implementation:
/// a description containing "PUT" wins, otherwise the first letter in the
/// contract suffix ('P' or 'C') decides, defaulting to call.
fn is_put(symbol: &str, underlying: &str, description: Option<&str>) -> bool {
    if let Some(desc) = description {
        let upper = desc.to_uppercase();
        if upper.contains("PUT") {
            return true;
        }
        if upper.contains("CALL") {
            return false;
        }
    }
    let suffix = &symbol[underlying.len().min(symbol.len())..];
    suffix
        .chars()
        .find(|c| *c == 'P' || *c == 'C' || *c == 'p' || *c == 'c')
        .is_some_and(|c| c.eq_ignore_ascii_case(&'P'))
}
