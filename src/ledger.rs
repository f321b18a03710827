// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to cents with banker's rounding. Every gold amount passes through
/// here before it is stored or compared. The result always carries exactly
/// two fractional digits so TEXT-encoded amounts stay uniform.
pub fn to_cents(value: Decimal) -> Decimal {
    let mut cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    cents.rescale(2);
    cents
}

/// The one balance-update rule: `new_balance = to_cents(old + delta)`.
/// The log entry written in the same transaction must carry this exact value
/// as `user_gold`.
pub fn apply_delta(balance: Decimal, delta: Decimal) -> Decimal {
    to_cents(balance + delta)
}
