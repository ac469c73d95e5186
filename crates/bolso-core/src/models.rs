//! Domain models for bolso

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ledger bucket a transaction is reported under
///
/// Materialized recurring bills land in `Fixed` (or `Income` for income
/// templates); one-off entries default to `Variable`; installment siblings
/// are `Installment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    Income,
    Fixed,
    Variable,
    Installment,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Fixed => "fixed",
            Self::Variable => "variable",
            Self::Installment => "installment",
        }
    }
}

impl std::str::FromStr for TransactionCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "fixed" => Ok(Self::Fixed),
            "variable" => Ok(Self::Variable),
            "installment" => Ok(Self::Installment),
            _ => Err(format!("Unknown transaction category: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A calendar month, used as the target window for materialization and
/// reports
///
/// `month` follows the chrono convention (1-12). The reference month is
/// always an explicit input — nothing in the core reads the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// First day of this month
    pub fn first_day(&self) -> NaiveDate {
        // month is validated at construction sites; fall back to January
        // rather than panic on corrupt input
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.year, 1, 1).expect("valid date"))
    }

    /// Last valid day number of this month (28-31)
    ///
    /// Computed as the day before the 1st of the following month, so leap
    /// years fall out of the calendar arithmetic instead of a lookup table.
    pub fn last_day(&self) -> u32 {
        self.next()
            .first_day()
            .pred_opt()
            .map(|d| d.day())
            .unwrap_or(28)
    }

    /// The following calendar month
    pub fn next(&self) -> MonthRef {
        if self.month >= 12 {
            MonthRef::new(self.year + 1, 1)
        } else {
            MonthRef::new(self.year, self.month + 1)
        }
    }

    /// Whether a date falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The date at `day` within this month, clamped to the month's last
    /// valid day (a "31st of April" becomes April 30). Degenerate day 0
    /// clamps up to the 1st; out-of-range values never error.
    pub fn clamped_day(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.last_day());
        NaiveDate::from_ymd_opt(self.year, self.month, day)
            .unwrap_or_else(|| self.first_day())
    }
}

impl std::fmt::Display for MonthRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Non-negative magnitude; direction is carried by `tx_type`
    pub amount: f64,
    pub description: String,
    /// Free-text category label; not validated at this layer
    pub category: Option<String>,
    pub tx_type: TransactionType,
    pub transaction_category: TransactionCategory,
    pub date: NaiveDate,
    /// Set when this transaction was materialized from a recurring template
    pub is_recurring: bool,
    /// Back-reference to the originating template (lookup key, not ownership)
    pub recurring_id: Option<i64>,
    /// Payment tracking, meaningful for fixed expenses
    pub is_paid: bool,
    pub paid_date: Option<NaiveDate>,
    /// Shared by sibling transactions of one installment purchase
    pub installment_group_id: Option<i64>,
    /// Idempotence key — re-persisting the same logical entry is a no-op
    pub origin_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A transaction to be persisted (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: f64,
    pub description: String,
    pub category: Option<String>,
    pub tx_type: TransactionType,
    pub transaction_category: TransactionCategory,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub recurring_id: Option<i64>,
    pub is_paid: bool,
    pub paid_date: Option<NaiveDate>,
    pub origin_hash: String,
}

impl NewTransaction {
    /// A plain one-off entry with a caller-supplied idempotence nonce
    pub fn manual(
        description: &str,
        amount: f64,
        category: Option<String>,
        tx_type: TransactionType,
        date: NaiveDate,
        nonce: &str,
    ) -> Self {
        let origin_hash = origin_hash(&["manual", &date.to_string(), description, nonce]);
        Self {
            amount,
            description: description.to_string(),
            category,
            tx_type,
            transaction_category: match tx_type {
                TransactionType::Income => TransactionCategory::Income,
                TransactionType::Expense => TransactionCategory::Variable,
            },
            date,
            is_recurring: false,
            recurring_id: None,
            is_paid: false,
            paid_date: None,
            origin_hash,
        }
    }
}

/// A monthly-repeating bill or income rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: i64,
    pub name: String,
    /// Non-negative magnitude, copied onto materialized transactions
    pub amount: f64,
    pub category: Option<String>,
    pub tx_type: TransactionType,
    /// Nominal day (1-31); materialization clamps to the target month
    pub day_of_month: u32,
    pub created_at: DateTime<Utc>,
}

/// A new recurring template (before DB insertion)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecurringTemplate {
    pub name: String,
    pub amount: f64,
    pub category: Option<String>,
    pub tx_type: TransactionType,
    pub day_of_month: u32,
}

/// Share of monthly income budgeted to one category
///
/// At most one goal exists per category; the persistence layer upserts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetGoal {
    pub id: i64,
    pub category: String,
    pub target_percentage: f64,
    pub created_at: DateTime<Utc>,
}

/// A canonical row produced by the statement normalizer
///
/// Ephemeral: consumed immediately to build transactions or handed to the
/// categorization oracle. The date is kept raw because statement date
/// formats vary by bank and locale; downstream code decides how to parse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedStatementRow {
    pub date: String,
    pub description: String,
    /// Signed: negative = money out, positive = money in
    pub amount: f64,
    pub category: Option<String>,
    pub bank: Option<String>,
}

/// SHA-256 over the given parts, hex encoded
///
/// Used as the transaction idempotence key: materialization hashes
/// (template, month), statement import hashes (date, description, amount),
/// so re-running either can never duplicate rows.
pub fn origin_hash(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_last_day() {
        assert_eq!(MonthRef::new(2024, 4).last_day(), 30);
        assert_eq!(MonthRef::new(2024, 2).last_day(), 29); // leap
        assert_eq!(MonthRef::new(2023, 2).last_day(), 28);
        assert_eq!(MonthRef::new(2024, 12).last_day(), 31);
    }

    #[test]
    fn test_month_clamped_day() {
        let april = MonthRef::new(2024, 4);
        assert_eq!(
            april.clamped_day(31),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
        );
        assert_eq!(
            april.clamped_day(15),
            NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
        );
        // corrupt upstream data clamps instead of erroring
        assert_eq!(
            april.clamped_day(0),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
        assert_eq!(
            april.clamped_day(99),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
        );
    }

    #[test]
    fn test_month_next_wraps_year() {
        assert_eq!(MonthRef::new(2024, 12).next(), MonthRef::new(2025, 1));
        assert_eq!(MonthRef::new(2024, 5).next(), MonthRef::new(2024, 6));
    }

    #[test]
    fn test_month_contains() {
        let feb = MonthRef::new(2024, 2);
        assert!(feb.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!feb.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!feb.contains(NaiveDate::from_ymd_opt(2023, 2, 10).unwrap()));
    }

    #[test]
    fn test_origin_hash_distinguishes_parts() {
        // the separator prevents ["ab", "c"] colliding with ["a", "bc"]
        assert_ne!(origin_hash(&["ab", "c"]), origin_hash(&["a", "bc"]));
        assert_eq!(origin_hash(&["a", "b"]), origin_hash(&["a", "b"]));
    }
}
