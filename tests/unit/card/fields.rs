use super::*;

fn date(y: &str, m: &str, d: &str) -> DateParts {
    DateParts {
        year: y.to_string(),
        month: m.to_string(),
        day: d.to_string(),
    }
}

#[test]
fn date_join_truncates_at_first_empty_part() {
    assert_eq!(date("2024", "", "").joined(), "2024");
    assert_eq!(date("2024", "5", "").joined(), "2024/5");
    assert_eq!(date("2024", "5", "10").joined(), "2024/5/10");
    assert_eq!(date("", "", "").joined(), "");
    assert_eq!(date("", "5", "10").joined(), "");
}

#[test]
fn empty_month_hides_day() {
    assert_eq!(date("2024", "", "10").joined(), "2024");
}

#[test]
fn field_boxes_match_card_layout() {
    assert_eq!(
        TextField::Commander.bounds(),
        Rect::new(700.0, 20.0, 885.0, 60.0)
    );
    assert_eq!(TextField::Server.bounds(), Rect::new(700.0, 73.0, 885.0, 113.0));
    assert_eq!(TextField::Date.bounds(), Rect::new(700.0, 125.0, 885.0, 165.0));
    assert_eq!(
        TextField::Comment.bounds(),
        Rect::new(577.0, 395.0, 885.0, 490.0)
    );
}

#[test]
fn date_parts_validate_against_selector_ranges() {
    assert!(validate_date_part(FieldInput::Year, "").is_ok());
    assert!(validate_date_part(FieldInput::Year, "2017").is_ok());
    assert!(validate_date_part(FieldInput::Year, "2016").is_err());
    let this_year = current_year();
    assert!(this_year >= FIRST_YEAR);
    assert!(validate_date_part(FieldInput::Year, &this_year.to_string()).is_ok());
    assert!(validate_date_part(FieldInput::Year, &(this_year + 1).to_string()).is_err());
    assert!(validate_date_part(FieldInput::Year, "4294967295").is_err());
    assert!(validate_date_part(FieldInput::Month, "12").is_ok());
    assert!(validate_date_part(FieldInput::Month, "13").is_err());
    assert!(validate_date_part(FieldInput::Day, "0").is_err());
    assert!(validate_date_part(FieldInput::Day, "31").is_ok());
    assert!(validate_date_part(FieldInput::Day, "x").is_err());
    assert!(validate_date_part(FieldInput::Comment, "anything").is_ok());
}

#[test]
fn server_lookup_by_index() {
    assert_eq!(server_name(0).unwrap(), "");
    assert_eq!(server_name(2).unwrap(), "横須賀");
    assert_eq!(server_name(17).unwrap(), "オデッサ");
    assert!(server_name(18).is_err());
}
