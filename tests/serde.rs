#![cfg(feature = "serde")]

use amortization::{amortization_schedule, LoanTerms};
use chrono::NaiveDate;
use test_log::test;

#[test]
fn loan_terms_round_trip() {
    let terms = LoanTerms::new(200000., 7.5, 30).unwrap();
    let json = serde_json::to_string(&terms).unwrap();
    assert_eq!(json, r#"{"principal":200000.0,"annual_rate":7.5,"term_years":30}"#);
    assert_eq!(serde_json::from_str::<LoanTerms>(&json).unwrap(), terms);
}

#[test]
fn deserializing_validates_loan_terms() {
    let err = serde_json::from_str::<LoanTerms>(
        r#"{"principal":0.0,"annual_rate":-5.0,"term_years":0}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("principal"), "{}", err);

    assert!(serde_json::from_str::<LoanTerms>(
        r#"{"principal":200000.0,"annual_rate":7.5,"term_years":4294967295}"#
    )
    .is_err());
    assert!(serde_json::from_str::<LoanTerms>(
        r#"{"principal":200000.0,"annual_rate":-1.0,"term_years":30}"#
    )
    .is_err());
}

#[test]
fn schedule_rows_serialize_with_iso_dates() {
    let table = amortization_schedule(
        12000.,
        0.,
        1,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    )
    .unwrap();
    let value = serde_json::to_value(&table).unwrap();
    assert_eq!(value["rows"][0]["due_date"], "2024-04-01");
    assert_eq!(value["rows"][0]["due_payment"], 1000.0);
    assert_eq!(value["rows"].as_array().unwrap().len(), 12);
}
