//! The single boundary where ledger event text becomes a notification kind.
//!
//! Ledger events carry free-form detail text; nothing outside this module
//! inspects that text. Unrecognized events translate to `None` and are
//! dropped by the ingestion loop.

use crate::domain::NotificationKind;

/// Classify a ledger event's detail text.
///
/// Matching is case-insensitive on keywords. Liquidation is checked first
/// since liquidation detail text often also mentions collateral.
#[must_use]
pub fn translate_event(detail: &str) -> Option<NotificationKind> {
    let text = detail.to_lowercase();

    if text.contains("liquidat") {
        return Some(NotificationKind::Liquidated);
    }
    if text.contains("repay") || text.contains("repaid") {
        return Some(NotificationKind::RepaySuccess);
    }
    if text.contains("borrow") {
        return Some(NotificationKind::BorrowSuccess);
    }
    if text.contains("withdr") || text.contains("remove") {
        return Some(NotificationKind::CollateralRemoved);
    }
    if text.contains("deposit") || text.contains("add") {
        return Some(NotificationKind::CollateralAdded);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrow_text_translates() {
        assert_eq!(
            translate_event("Borrowed 100 USD against SOL collateral"),
            Some(NotificationKind::BorrowSuccess)
        );
    }

    #[test]
    fn repay_text_translates() {
        assert_eq!(
            translate_event("Repaid 50 USD of outstanding debt"),
            Some(NotificationKind::RepaySuccess)
        );
        assert_eq!(
            translate_event("repayment of 50 USD received"),
            Some(NotificationKind::RepaySuccess)
        );
    }

    #[test]
    fn collateral_movements_translate() {
        assert_eq!(
            translate_event("Deposited 2 SOL as collateral"),
            Some(NotificationKind::CollateralAdded)
        );
        assert_eq!(
            translate_event("Added 2 SOL to position"),
            Some(NotificationKind::CollateralAdded)
        );
        assert_eq!(
            translate_event("Withdrew 1 SOL of collateral"),
            Some(NotificationKind::CollateralRemoved)
        );
        assert_eq!(
            translate_event("Removed 1 SOL from position"),
            Some(NotificationKind::CollateralRemoved)
        );
    }

    #[test]
    fn liquidation_wins_over_collateral_mentions() {
        assert_eq!(
            translate_event("Position liquidated, collateral removed and debt repaid"),
            Some(NotificationKind::Liquidated)
        );
    }

    #[test]
    fn unknown_text_translates_to_none() {
        assert_eq!(translate_event("Oracle feed rotated"), None);
        assert_eq!(translate_event(""), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            translate_event("BORROWED 10"),
            Some(NotificationKind::BorrowSuccess)
        );
    }
}
