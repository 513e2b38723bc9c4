//! # mutuum-lending
//!
//! Loan offers, requests, and the agreement state machine for the mutuum
//! protocol.
//!
//! The lending desk escrows offer principal and agreement collateral,
//! drives each agreement through the lifecycle below, classifies the
//! payment trajectory at settlement, and on default seizes collateral and
//! slashes the borrower's vouches through the reputation book.
//!
//! ## Agreement Lifecycle
//!
//! ```text
//!            accept_offer / fund_request
//!                        │
//!                        ▼
//!        ┌────────────► Active ◄───────────────┐
//!        │               │  ▲                   │
//!        │    (overdue partial payment)         │ (exact agreed
//!        │               ▼  │                   │  partial payment)
//!        │            Overdue                   │
//!        │               │                      │
//!        │  request_modification                │
//!        │               ▼                      │
//!        │  PendingModificationApproval         │
//!        │     │ approve(extension)             │
//!        └─────┤ reject                         │
//!              │ approve(partial) ──► ActivePartialPaymentAgreed
//!              ▼
//!   amount_paid ≥ total_due ──► Repaid (terminal)
//!   handle_default          ──► Defaulted (terminal)
//! ```
//!
//! Offers and requests reach their own `Cancelled` terminal observation
//! via [`LendingManager::cancel_offer`] / [`LendingManager::cancel_request`].
//!
//! ## Example
//!
//! See the `mutuum-core` crate for wired end-to-end scenarios; this crate
//! operates on collaborator handles (token directory, user registry,
//! reputation book) passed into each operation.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod agreement;
pub mod classifier;
pub mod error;
pub mod event;
pub mod manager;
pub mod math;
pub mod offer;
pub mod request;

#[cfg(test)]
mod proptests;

pub use agreement::{LoanAgreement, LoanStatus};
pub use classifier::classify_payment_outcome;
pub use error::{LendingError, Result};
pub use event::LendingEvent;
pub use manager::LendingManager;
pub use math::{slash_amount, total_due, SLASH_BPS};
pub use offer::LoanOffer;
pub use request::LoanRequest;
