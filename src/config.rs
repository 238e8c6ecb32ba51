use std::time::Duration;

/// Daily order report export endpoint on the NPA reporting API.
pub const REPORT_ENDPOINT: &str =
    "https://iml.npa-enterprise.com/NPAAPILIVE/Home/ExportDailyOrderReport";

/// The two spellings of the target depot seen in the wild. Matching is a
/// plain case-sensitive substring test, so both must be listed explicitly.
pub const DEPOT_SPELLINGS: &[&str] = &["BOST-KUMASI", "BOST - KUMASI"];

/// Title line printed on page 1 of the PDF rendering.
pub const PDF_TITLE: &str = "DEPOT: BOST - KUMASI";

/// Date format the reporting API expects for its window parameters.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Source column position → canonical column name, in canonical order.
/// The export carries no usable header row, so the schema is addressed by
/// position; keeping the pairs here decouples it from the sheet layout.
pub const CANONICAL_COLUMNS: &[(usize, &str)] = &[
    (0, "ORDER DATE"),
    (2, "ORDER NUMBER"),
    (5, "PRODUCTS"),
    (9, "VOLUME"),
    (10, "EX REF PRICE"),
    (12, "BRV NUMBER"),
    (15, "BDC"),
];

/// How a row qualifies as belonging to the target depot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepotMatch {
    /// Any cell contains one of the depot spellings.
    Substring,
    /// Substring match, or the row's last cell is blank. Some report
    /// variants leave the depot cell empty on continuation rows; which
    /// policy is correct upstream is still an open product question.
    SubstringOrBlankTail,
}

/// Everything one report run needs, gathered into a single value so that
/// callers (and tests) can inject it rather than having each stage
/// reconstruct parameters from ambient state.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub endpoint: String,
    pub company_id: u32,
    pub company_name: String,
    pub user_id: u32,
    pub app_id: u32,
    /// Bound on the single outbound request.
    pub timeout: Duration,
    /// Width of the report window in days; the window ends "today".
    pub window_days: i64,
    /// Leading boilerplate rows to drop before any cleaning stage.
    pub header_rows: usize,
    pub depot_spellings: Vec<String>,
    pub depot_match: DepotMatch,
    /// `(source column index, canonical name)` pairs, canonical order.
    pub columns: Vec<(usize, String)>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            endpoint: REPORT_ENDPOINT.to_string(),
            company_id: 1,
            company_name: "VEROS PETROLEUM LIMITED".to_string(),
            user_id: 123_290,
            app_id: 4,
            timeout: Duration::from_secs(30),
            window_days: 1,
            header_rows: 7,
            depot_spellings: DEPOT_SPELLINGS.iter().map(|s| s.to_string()).collect(),
            depot_match: DepotMatch::Substring,
            columns: CANONICAL_COLUMNS
                .iter()
                .map(|(i, name)| (*i, name.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_columns_keep_declared_order() {
        let cfg = ReportConfig::default();
        let names: Vec<&str> = cfg.columns.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ORDER DATE",
                "ORDER NUMBER",
                "PRODUCTS",
                "VOLUME",
                "EX REF PRICE",
                "BRV NUMBER",
                "BDC"
            ]
        );
    }

    #[test]
    fn default_window_is_two_days_wide() {
        let cfg = ReportConfig::default();
        assert_eq!(cfg.window_days, 1);
        assert_eq!(cfg.header_rows, 7);
        assert_eq!(cfg.depot_match, DepotMatch::Substring);
    }
}
