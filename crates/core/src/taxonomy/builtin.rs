//! Curated default reference data: class definitions, symbol membership
//! sets, and description keyword lists.
//!
//! These tables are data, not logic — they can be revised without touching
//! the classifier, and tests substitute smaller fixtures via `Taxonomy::new`.

use std::collections::HashSet;

use super::{class_ids, sub_class_ids, AssetClass, KeywordLists, SubAssetClass, SymbolSets, Taxonomy};

fn set(symbols: &[&str]) -> HashSet<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn sub(id: &str, name: &str) -> SubAssetClass {
    SubAssetClass {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub(super) fn build() -> Taxonomy {
    let classes = vec![
        AssetClass::new(class_ids::CASH, "Cash & Equivalents"),
        AssetClass::new(class_ids::TECH_EQUITIES, "Tech Equities").with_sub_classes(vec![
            sub(sub_class_ids::TECH_STOCKS, "Tech Stocks"),
            sub(sub_class_ids::TECH_ETFS, "Tech ETFs"),
            sub(sub_class_ids::TECH_FUNDS, "Tech Funds"),
        ]),
        AssetClass::new(class_ids::NON_TECH_EQUITIES, "Non-Tech Equities"),
        AssetClass::new(class_ids::CRYPTO, "Crypto").with_sub_classes(vec![
            sub(sub_class_ids::BITCOIN_ETF, "Bitcoin ETF"),
            sub(sub_class_ids::ETHEREUM_ETF, "Ethereum ETF"),
            sub(sub_class_ids::CRYPTO_STOCKS, "Crypto Stocks"),
        ]),
        AssetClass::new(class_ids::PRECIOUS_METALS, "Precious Metals"),
        AssetClass::new(class_ids::REAL_ESTATE, "Real Estate"),
        AssetClass::new(class_ids::TECH_OPTIONS, "Tech Options").with_sub_classes(vec![
            sub(sub_class_ids::CALLS, "Calls"),
            sub(sub_class_ids::PUTS, "Puts"),
        ]),
        AssetClass::new(class_ids::DEBT, "Debt"),
    ];

    let symbols = SymbolSets {
        cash_equivalents: set(&[
            "SPAXX", "FDRXX", "SPRXX", "FZFXX", "VMFXX", "VMRXX", "SWVXX", "SNVXX", "BIL",
            "SGOV", "SHV", "USFR", "TFLO",
        ]),
        bitcoin_etfs: set(&[
            "IBIT", "FBTC", "GBTC", "ARKB", "BITB", "HODL", "BRRR", "BTCO", "EZBC", "BITO",
        ]),
        ethereum_etfs: set(&[
            "ETHA", "FETH", "ETHE", "ETHW", "ETHV", "EZET", "QETH", "CETH",
        ]),
        crypto_stocks: set(&[
            "COIN", "MSTR", "MARA", "RIOT", "CLSK", "HUT", "BITF", "CIFR", "WULF", "HIVE",
            "GLXY", "BKKT",
        ]),
        crypto_other: set(&[
            "BTC", "ETH", "SOL", "ADA", "DOGE", "XRP", "LTC", "DOT", "AVAX", "LINK", "BITX",
        ]),
        precious_metals: set(&[
            "GLD", "IAU", "GLDM", "SGOL", "AAAU", "OUNZ", "SLV", "PSLV", "SIVR", "PPLT",
            "PALL", "GDX", "GDXJ", "XAU", "XAG",
        ]),
        real_estate: set(&[
            "VNQ", "SCHH", "XLRE", "IYR", "RWR", "VNQI", "REET", "O", "AMT", "PLD", "SPG",
            "EQIX", "PSA", "DLR", "WELL",
        ]),
        tech: set(&[
            // Individual stocks
            "AAPL", "MSFT", "NVDA", "GOOGL", "GOOG", "AMZN", "META", "TSLA", "AMD", "AVGO",
            "CRM", "ORCL", "ADBE", "INTC", "QCOM", "NFLX", "NOW", "SHOP", "PLTR", "SNOW",
            "UBER", "PANW", "MU", "SMCI", "ARM", "TSM", "ASML", "CRWD", "NET", "DDOG",
            // ETFs and funds (sub-classified by the second pass)
            "QQQ", "QQQM", "XLK", "VGT", "SMH", "SOXX", "IGV", "FTEC", "ARKK", "ARKW", "TQQQ",
            "FSPTX", "PRGTX", "FSELX", "FDCPX", "ROGSX",
        ]),
        non_tech: set(&[
            "JPM", "BAC", "WFC", "GS", "MS", "BRK.B", "BRK.A", "JNJ", "PFE", "LLY", "UNH",
            "XOM", "CVX", "KO", "PEP", "PG", "WMT", "COST", "HD", "MCD", "DIS", "V", "MA",
            "CAT", "BA", "GE", "F", "GM", "SPY", "VOO", "VTI", "IVV", "DIA", "IWM", "SCHD",
            "VIG", "VT", "VXUS",
        ]),
        tech_etfs: set(&[
            "QQQ", "QQQM", "XLK", "VGT", "SMH", "SOXX", "IGV", "FTEC", "ARKK", "ARKW", "TQQQ",
        ]),
        tech_funds: set(&["FSPTX", "PRGTX", "FSELX", "FDCPX", "ROGSX"]),
    };

    let keywords = KeywordLists {
        money_market: words(&[
            "money market",
            "treasury",
            "t-bill",
            "government obligations",
            "cash reserves",
            "cash management",
        ]),
        crypto: words(&["crypto", "bitcoin", "ethereum", "blockchain", "digital asset"]),
        precious_metals: words(&["gold", "silver", "platinum", "palladium", "precious metal"]),
        real_estate: words(&["real estate", "reit", "realty", "property trust"]),
        tech: words(&[
            "technology",
            "semiconductor",
            "software",
            "artificial intelligence",
            "cloud computing",
            "cybersecurity",
            "fintech",
            "internet",
            "robotics",
            "data center",
            "e-commerce",
        ]),
    };

    Taxonomy::new(classes, symbols, keywords)
}
