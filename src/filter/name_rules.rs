//! Name-pattern exclusion of legitimate high-volume actors

use serde::Serialize;
use std::fmt;

const PAYROLL_KEYWORDS: [&str; 5] = ["PAYROLL", "SALARY", "HR_", "EMPLOYEE", "STAFF"];
const MERCHANT_KEYWORDS: [&str; 5] = ["MERCHANT", "SHOP", "STORE_", "RETAIL", "MART"];
const UTILITY_KEYWORDS: [&str; 6] = ["UTILITY", "BILL", "TAX_", "WATER", "ELECTRIC", "GAS"];
const BUSINESS_KEYWORDS: [&str; 5] = ["BUSINESS", "CORP", "INC", "LTD", "LLC"];

/// Family of legitimate account names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordGroup {
    Payroll,
    Merchant,
    Utility,
    Business,
}

impl KeywordGroup {
    pub const ALL: [KeywordGroup; 4] = [
        KeywordGroup::Payroll,
        KeywordGroup::Merchant,
        KeywordGroup::Utility,
        KeywordGroup::Business,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            KeywordGroup::Payroll => &PAYROLL_KEYWORDS,
            KeywordGroup::Merchant => &MERCHANT_KEYWORDS,
            KeywordGroup::Utility => &UTILITY_KEYWORDS,
            KeywordGroup::Business => &BUSINESS_KEYWORDS,
        }
    }
}

impl fmt::Display for KeywordGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeywordGroup::Payroll => "payroll",
            KeywordGroup::Merchant => "merchant",
            KeywordGroup::Utility => "utility",
            KeywordGroup::Business => "business",
        };
        f.write_str(name)
    }
}

/// First keyword found in the upper-cased account id.
///
/// Plain substring test: `ACC_INCOME` matches `INC`.
pub fn legitimate_name_match(account_id: &str) -> Option<(KeywordGroup, &'static str)> {
    let upper = account_id.to_uppercase();

    KeywordGroup::ALL.iter().find_map(|&group| {
        group
            .keywords()
            .iter()
            .find(|keyword| upper.contains(*keyword))
            .map(|&keyword| (group, keyword))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payroll_match() {
        assert_eq!(
            legitimate_name_match("ACC_PAYROLL_001"),
            Some((KeywordGroup::Payroll, "PAYROLL"))
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            legitimate_name_match("acc_corner_shop"),
            Some((KeywordGroup::Merchant, "SHOP"))
        );
    }

    #[test]
    fn test_substring_not_word_boundary() {
        assert_eq!(
            legitimate_name_match("ACC_INCOME"),
            Some((KeywordGroup::Business, "INC"))
        );
        assert_eq!(
            legitimate_name_match("ACC_VEGAS_77"),
            Some((KeywordGroup::Utility, "GAS"))
        );
    }

    #[test]
    fn test_plain_account_does_not_match() {
        assert_eq!(legitimate_name_match("ACC_00123"), None);
    }
}
