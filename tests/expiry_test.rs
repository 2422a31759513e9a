mod common;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use payreq::application::request::PaymentRequest;
use payreq::domain::clock::FixedClock;
use std::cell::Cell;

fn at(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .unwrap()
}

fn card_request(year: &str, month: &str) -> PaymentRequest {
    PaymentRequest::try_from(common::card_request(year, month)).unwrap()
}

fn set_expiry(request: &mut PaymentRequest, year: &str, month: &str) {
    let card = request
        .payment_method_data_mut()
        .and_then(|data| data.card_mut())
        .unwrap();
    card.set_expiry_year(year).unwrap();
    card.set_expiry_month(month).unwrap();
}

#[test]
fn test_expiry_sequence() {
    let mut clock = FixedClock(at(2019, 3, 10, 0, 0, 0));
    let mut request = card_request("2019", "11");
    assert!(request.validate_with(&clock).is_ok());

    // Obviously expired
    set_expiry(&mut request, "2018", "11");
    assert!(request.validate_with(&clock).is_err());

    // Same month
    set_expiry(&mut request, "2019", "03");
    assert!(request.validate_with(&clock).is_ok());

    // Last second of the month in the same zone
    clock = FixedClock(at(2019, 3, 31, 23, 59, 59));
    assert!(request.validate_with(&clock).is_ok());

    // UTC-12 client against a UTC+14 bank, plus a daylight saving hour
    let skew = TimeDelta::hours(26) + TimeDelta::hours(1);
    clock = FixedClock(clock.0 + skew);
    assert!(request.validate_with(&clock).is_ok());

    // Couple of days after expiration
    clock = FixedClock(at(2019, 4, 3, 0, 0, 0));
    let err = request.validate_with(&clock).unwrap_err();
    assert!(err.to_string().contains("expired"));
}

#[test]
fn test_expiry_boundary_is_exclusive() {
    let request = card_request("2019", "03");
    assert!(request.validate_with(&FixedClock(at(2019, 4, 2, 2, 59, 59))).is_ok());
    assert!(request.validate_with(&FixedClock(at(2019, 4, 2, 3, 0, 0))).is_err());
}

#[test]
fn test_december_card_rolls_into_next_year() {
    let request = card_request("2019", "12");
    assert!(request.validate_with(&FixedClock(at(2019, 12, 31, 12, 0, 0))).is_ok());
    assert!(request.validate_with(&FixedClock(at(2020, 1, 2, 3, 0, 0))).is_err());
}

#[test]
fn test_closure_clock_is_read_on_each_validation() {
    let request = card_request("2019", "03");
    let now = Cell::new(at(2019, 3, 10, 0, 0, 0));
    let clock = || now.get();

    assert!(request.validate_with(&clock).is_ok());
    now.set(at(2019, 5, 1, 0, 0, 0));
    assert!(request.validate_with(&clock).is_err());
}
