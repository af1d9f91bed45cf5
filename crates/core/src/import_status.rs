//! Lifecycle of an import report.
//!
//! A report is born in `preview`. Committing moves it to `committed` (no
//! rejected rows) or `partial`; cancelling moves it to `cancelled`. Only a
//! `preview` report can change state. The names are the rows seeded into
//! `import_report_statuses`.

pub const IMPORT_STATUS_PREVIEW: &str = "preview";
pub const IMPORT_STATUS_COMMITTED: &str = "committed";
pub const IMPORT_STATUS_PARTIAL: &str = "partial";
pub const IMPORT_STATUS_CANCELLED: &str = "cancelled";

/// Whether a report in `status` can still be committed or cancelled.
pub fn is_pending(status: &str) -> bool {
    status == IMPORT_STATUS_PREVIEW
}

/// Status a successful commit ends in.
pub fn commit_status(rejected: i32) -> &'static str {
    if rejected == 0 {
        IMPORT_STATUS_COMMITTED
    } else {
        IMPORT_STATUS_PARTIAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_preview_is_pending() {
        assert!(is_pending(IMPORT_STATUS_PREVIEW));
        assert!(!is_pending(IMPORT_STATUS_COMMITTED));
        assert!(!is_pending(IMPORT_STATUS_PARTIAL));
        assert!(!is_pending(IMPORT_STATUS_CANCELLED));
    }

    #[test]
    fn rejected_rows_make_a_commit_partial() {
        assert_eq!(commit_status(0), IMPORT_STATUS_COMMITTED);
        assert_eq!(commit_status(3), IMPORT_STATUS_PARTIAL);
    }
}
