use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Serialize, Deserialize};
use colored::Colorize;

use crate::core::category::Category;
use crate::core::error::{TransactionError, TransactionResult};

pub type Amount = f64;
pub type TransactionId = u64;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income
}

impl TransactionKind {
    /// Sign applied to an amount of this kind when computing the balance.
    pub fn sign(&self) -> Amount {
        match self {
            Self::Expense => -1.0,
            Self::Income => 1.0
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let disp = match self {
            Self::Expense => "expense",
            Self::Income => "income"
        };
        write!(f, "{}", disp)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(format!("expected `expense` or `income`, got `{}`", other))
        }
    }
}

/// Parses user input into a positive amount.
pub fn parse_amount(input: &str) -> TransactionResult<Amount> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TransactionError::MissingAmount);
    }
    let amount: Amount = trimmed.parse()
        .map_err(|_| TransactionError::InvalidAmount(trimmed.to_owned()))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(TransactionError::NonPositiveAmount(amount));
    }
    return Ok(amount);
}

/// Renders an amount with thousands separators and at most two decimals.
pub fn format_amount(amount: Amount) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: Category,
    pub note: String,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>
}

impl Transaction {
    pub fn new_at(id: TransactionId, amount: Amount, kind: TransactionKind, category: &Category, note: &str, date: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            amount,
            kind,
            category: category.clone(),
            note: note.to_owned(),
            date: date.trunc_subsecs(3)
        }
    }

    pub fn signed_amount(&self) -> Amount {
        self.kind.sign() * self.amount
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_income() { '+' } else { '-' };
        write!(f, "#{} {} {} {} {}{}",
            self.id,
            self.date.format("%Y-%m-%d"),
            self.category.icon,
            self.category.name.bold(),
            sign,
            format_amount(self.amount))?;
        if !self.note.is_empty() {
            write!(f, " ({})", self.note)?;
        }
        return Ok(());
    }
}

/// ISO-8601 timestamps with exactly three fractional digits and a `Z` suffix.
/// Any offset or finer precision read back is normalized to that form.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|date| date.with_timezone(&Utc).trunc_subsecs(3))
            .map_err(de::Error::custom)
    }
}


#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use serde_json::json;

    use crate::core::{Category, Transaction};
    use crate::core::error::TransactionError;
    use crate::core::transaction::{format_amount, parse_amount, TransactionKind};

    #[fixture]
    fn transport() -> Category {
        Category::new("transport", "Transport", "bus")
    }

    #[fixture]
    fn transaction(transport: Category) -> Transaction {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 8, 15, 30).unwrap()
            + chrono::Duration::milliseconds(250);
        Transaction::new_at(1710000000250, 50.0, TransactionKind::Expense, &transport, "bus", date)
    }

    #[rstest]
    #[case("100", 100.0)]
    #[case(" 40.5 ", 40.5)]
    #[case("0.01", 0.01)]
    #[case("1e3", 1000.0)]
    fn parses_valid_amounts(#[case] input: &str, #[case] expected: f64) {
        assert_eq!(parse_amount(input), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_missing_amount(#[case] input: &str) {
        assert_eq!(parse_amount(input), Err(TransactionError::MissingAmount));
    }

    #[rstest]
    #[case("abc")]
    #[case("12abc")]
    #[case("1,000")]
    fn rejects_non_numeric_amount(#[case] input: &str) {
        assert!(matches!(parse_amount(input), Err(TransactionError::InvalidAmount(_))));
    }

    #[rstest]
    #[case("0")]
    #[case("-5")]
    #[case("inf")]
    #[case("NaN")]
    fn rejects_non_positive_amount(#[case] input: &str) {
        assert!(matches!(parse_amount(input), Err(TransactionError::NonPositiveAmount(_))));
    }

    #[rstest]
    #[case(0.0, "0")]
    #[case(40.0, "40")]
    #[case(1234.5, "1,234.5")]
    #[case(1234567.891, "1,234,567.89")]
    #[case(-60.25, "-60.25")]
    #[case(999.999, "1,000")]
    fn formats_amounts(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("Expense".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("refund".parse::<TransactionKind>().is_err());
    }

    #[rstest]
    fn signed_amount_follows_kind(transaction: Transaction, transport: Category) {
        assert_eq!(transaction.signed_amount(), -50.0);
        let income = Transaction::new_at(2, 50.0, TransactionKind::Income, &transport, "", Utc::now());
        assert_eq!(income.signed_amount(), 50.0);
    }

    #[rstest]
    fn can_print(transaction: Transaction) {
        colored::control::set_override(false);
        assert_eq!(transaction.to_string(), "#1710000000250 2024-03-09 bus Transport -50 (bus)");
    }

    #[rstest]
    fn serializes_to_storage_layout(transaction: Transaction) {
        let value = serde_json::to_value(&transaction).unwrap();
        assert_eq!(value, json!({
            "id": 1710000000250u64,
            "amount": 50.0,
            "type": "expense",
            "category": {"id": "transport", "name": "Transport", "icon": "bus"},
            "note": "bus",
            "date": "2024-03-09T08:15:30.250Z"
        }));
    }

    #[rstest]
    fn creation_truncates_to_milliseconds(transport: Category) {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::microseconds(1_999);
        let transaction = Transaction::new_at(1, 1.0, TransactionKind::Income, &transport, "", date);
        assert_eq!(transaction.date.timestamp_subsec_micros(), 1_000);
    }

    #[rstest]
    #[case("2024-03-09T08:15:30.250987Z")]
    #[case("2024-03-09T15:15:30.250+07:00")]
    #[case("2024-03-09T08:15:30.25Z")]
    fn stored_dates_normalize_to_millis_utc(#[case] date: &str, transaction: Transaction) {
        let mut value = serde_json::to_value(&transaction).unwrap();
        value["date"] = json!(date);

        let loaded: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(loaded, transaction);

        let saved = serde_json::to_string(&loaded).unwrap();
        let reloaded: Transaction = serde_json::from_str(&saved).unwrap();
        assert_eq!(reloaded, loaded);
        assert_eq!(serde_json::to_value(&reloaded).unwrap()["date"], json!("2024-03-09T08:15:30.250Z"));
    }

    #[test]
    fn rejects_bad_kind_in_json() {
        let value = json!({
            "id": 1, "amount": 1.0, "type": "refund",
            "category": {"id": "food", "name": "Food", "icon": "fast-food"},
            "note": "", "date": "2024-03-09T08:15:30.250Z"
        });
        assert!(serde_json::from_value::<Transaction>(value).is_err());
    }
}
