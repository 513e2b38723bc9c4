//! Score-delta constants.
//!
//! One constant per classified outcome, for each side of a loan. Test
//! suites read these constants instead of hardcoding values.

/// Borrower repaid in full, on time, under the original terms.
pub const REPAID_ON_TIME_ORIGINAL: i64 = 10;

/// Borrower repaid in full after the original due date (late grace).
pub const REPAID_LATE_GRACE: i64 = 3;

/// Borrower repaid on time under a lender-approved due-date extension.
pub const REPAID_ON_TIME_AFTER_EXTENSION: i64 = 7;

/// Borrower repaid late even under a lender-approved extension.
pub const REPAID_LATE_AFTER_EXTENSION: i64 = 2;

/// Borrower met an approved partial-payment agreement and then repaid.
pub const REPAID_WITH_PARTIAL_AGREEMENT_MET: i64 = 8;

/// Borrower defaulted.
pub const DEFAULTED: i64 = -50;

/// Lender's loan was repaid on time under the original terms.
pub const LENT_SUCCESSFULLY_ON_TIME_ORIGINAL: i64 = 5;

/// Lender's loan was repaid after some term modification was involved.
pub const LENT_SUCCESSFULLY_AFTER_MODIFICATION: i64 = 3;

/// Add-on for a lender who approved a due-date extension.
pub const LENDER_APPROVED_EXTENSION: i64 = 2;

/// Add-on for a lender who approved a partial-payment agreement.
pub const LENDER_APPROVED_PARTIAL_AGREEMENT: i64 = 1;

/// Add-on for a lender who rejected a requested modification.
pub const LENDER_REJECTED_MODIFICATION: i64 = 0;

/// Penalty applied to a voucher whose vouchee defaulted.
pub const VOUCH_DEFAULTED_VOUCHER: i64 = -20;
