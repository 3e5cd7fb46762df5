use asset_register::reports::{write_charges_csv, write_inventory_csv, DEFAULT_DELIMITER};
use chrono::NaiveDate;
use register_core::{AssetFilter, RegisterService, ReportService};
use register_domain::Register;

fn seeded() -> Register {
    let mut register = RegisterService::create("Exports");
    RegisterService::seed_sample(&mut register);
    register
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn to_text(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).unwrap().replace("\r\n", "\n")
}

#[test]
fn inventory_csv_matches_snapshot() {
    let report =
        ReportService::inventory(&seeded(), &AssetFilter::default(), date(2030, 1, 1)).unwrap();
    let mut buffer = Vec::new();
    write_inventory_csv(&mut buffer, &report, DEFAULT_DELIMITER).unwrap();

    insta::assert_snapshot!(to_text(buffer), @r"
    code;label;family;location;acquisition_date;method;duration_years;original_value;accumulated_depreciation;net_book_value;status
    215400;MATERIEL INDUSTRIEL;MI;U1;2020-03-15;DEGRESSIF;5;15000.00;15000.00;0.00;Amorti
    218200;MATERIEL DE TRANSPORT;VEH;AP;2021-06-10;LINEAIRE;4;25000.00;25000.00;0.00;Amorti
    CHF02;FAUTEUILS DE DIRECTION;MOB;SS;1999-01-01;LINEAIRE;3;446.68;446.68;0.00;Amorti
    ");
}

#[test]
fn charges_csv_lists_second_year_amounts() {
    let report = ReportService::charges_for_year(&seeded(), 2021, date(2030, 1, 1)).unwrap();
    let mut buffer = Vec::new();
    write_charges_csv(&mut buffer, &report, DEFAULT_DELIMITER).unwrap();
    let text = to_text(buffer);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "215400;MATERIEL INDUSTRIEL;MI;DEGRESSIF;35.00;15000.00;3412.50;8662.50;6337.50"
    );
    assert_eq!(
        lines[2],
        "218200;MATERIEL DE TRANSPORT;VEH;LINEAIRE;25.00;25000.00;6250.00;6250.00;18750.00"
    );
}

#[test]
fn comma_delimiter_is_honoured() {
    let report =
        ReportService::inventory(&seeded(), &AssetFilter::default(), date(2030, 1, 1)).unwrap();
    let mut buffer = Vec::new();
    write_inventory_csv(&mut buffer, &report, ',').unwrap();
    let text = to_text(buffer);
    assert!(text.starts_with("code,label,family,location,"));
    assert!(text.contains("CHF02,FAUTEUILS DE DIRECTION,MOB,SS,1999-01-01,LINEAIRE,3,"));
}
