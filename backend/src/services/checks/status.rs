use common::model::check::CheckStatus;

/// The one status-derivation rule, shared by every submission path.
///
/// Nothing checked fails the check outright; anything short of a full
/// sweep is partial.
pub fn derive_status(checked_count: usize, total_items: usize) -> CheckStatus {
    if checked_count == 0 {
        CheckStatus::Failed
    } else if checked_count < total_items {
        CheckStatus::Partial
    } else {
        CheckStatus::Passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_checked_is_failed() {
        assert_eq!(derive_status(0, 5), CheckStatus::Failed);
        assert_eq!(derive_status(0, 1), CheckStatus::Failed);
    }

    #[test]
    fn some_checked_is_partial() {
        assert_eq!(derive_status(1, 5), CheckStatus::Partial);
        assert_eq!(derive_status(4, 5), CheckStatus::Partial);
    }

    #[test]
    fn all_checked_is_passed() {
        assert_eq!(derive_status(5, 5), CheckStatus::Passed);
        assert_eq!(derive_status(1, 1), CheckStatus::Passed);
    }
}
