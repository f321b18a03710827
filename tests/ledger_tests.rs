// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use questclip::ledger::{apply_delta, to_cents};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

#[test]
fn to_cents_rounds_half_to_even() {
    let cases = [
        ("2.344", "2.34"),
        ("2.345", "2.34"), // 4 is even
        ("2.355", "2.36"), // 6 is even
        ("2.005", "2.00"),
        ("-2.345", "-2.34"),
    ];
    for (input, expected) in cases {
        assert_eq!(to_cents(dec(input)), dec(expected), "input {input}");
    }
}

#[test]
fn to_cents_is_idempotent() {
    for s in ["0.01", "12.50", "-99.99", "3.333"] {
        let once = to_cents(dec(s));
        assert_eq!(to_cents(once), once);
    }
}

#[test]
fn apply_delta_rounds_the_sum_once() {
    assert_eq!(apply_delta(dec("10.00"), dec("2.004")), dec("12.00"));
    assert_eq!(apply_delta(dec("10.00"), dec("-0.005")), dec("10.00"));
    assert_eq!(apply_delta(dec("0.00"), dec("12.345")), dec("12.34"));
}

#[test]
fn streak_bonus_math_matches_cent_precision() {
    // base 10.00 at +25% => 12.50
    let base = to_cents(dec("10.00"));
    let bonus = dec("25");
    let final_gold = to_cents(base * (Decimal::ONE + bonus / Decimal::ONE_HUNDRED));
    assert_eq!(final_gold, dec("12.50"));

    // odd percentages still land on cents
    let final_gold = to_cents(dec("1.99") * (Decimal::ONE + dec("33") / Decimal::ONE_HUNDRED));
    assert_eq!(final_gold, dec("2.65"));
}
