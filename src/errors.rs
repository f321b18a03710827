// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Everything a task action can reject. All variants except `Retryable` and
/// `Storage` are user-facing precondition failures; the transaction they abort
/// rolls back fully, so no partial task/profile/log write ever lands.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Ownership(&'static str),

    #[error("this action is only valid for {expected} tasks (got {actual})")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("task is already completed for this period")]
    AlreadyCompleted,

    #[error("reward has already been claimed")]
    AlreadyClaimed,

    #[error("insufficient funds: balance {balance} cannot cover cost {cost}")]
    InsufficientFunds { balance: Decimal, cost: Decimal },

    #[error("{0}")]
    InvalidInput(String),

    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// The store timed out waiting for a writer. Safe to retry; nothing was
    /// committed.
    #[error("the database is busy, retry the operation")]
    Retryable(#[source] rusqlite::Error),

    #[error("storage error")]
    Storage(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for ActionError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _)
                if matches!(
                    code.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                ActionError::Retryable(err)
            }
            _ => ActionError::Storage(err),
        }
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
