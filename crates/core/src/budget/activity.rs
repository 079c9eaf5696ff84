//! Recorded transaction activity inside the summary range.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::summary::percent_of;
use super::types::{
    CategoryKey, CategoryRecord, CategorySpending, TransactionBreakdown, TransactionRecord,
    UNCATEGORIZED_LABEL,
};
use crate::records::TransactionType;

/// Totals income and expense, grouping expenses by category.
///
/// Transactions pointing at a category missing from `categories` land in the
/// uncategorized bucket.
#[must_use]
pub fn breakdown(
    transactions: &[TransactionRecord],
    categories: &[CategoryRecord],
) -> TransactionBreakdown {
    let labels: HashMap<_, _> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut index: HashMap<CategoryKey, usize> = HashMap::new();
    let mut groups: Vec<(CategoryKey, Decimal, usize)> = Vec::new();

    for tx in transactions {
        match tx.transaction_type {
            TransactionType::Income => total_income += tx.amount,
            TransactionType::Expense => {
                total_expense += tx.amount;
                let key = match tx.category_id {
                    Some(id) if labels.contains_key(&id) => CategoryKey::Known(id),
                    _ => CategoryKey::Uncategorized,
                };
                let slot = *index.entry(key).or_insert_with(|| {
                    groups.push((key, Decimal::ZERO, 0));
                    groups.len() - 1
                });
                groups[slot].1 += tx.amount;
                groups[slot].2 += 1;
            }
        }
    }

    let by_category = groups
        .into_iter()
        .map(|(key, amount, count)| CategorySpending {
            category_id: key.id(),
            category_name: key
                .id()
                .and_then(|id| labels.get(&id).copied())
                .unwrap_or(UNCATEGORIZED_LABEL)
                .to_string(),
            amount,
            count,
            percentage: percent_of(amount, total_expense),
        })
        .collect();

    TransactionBreakdown {
        total_income,
        total_expense,
        net: total_income - total_expense,
        count: transactions.len(),
        by_category,
    }
}
