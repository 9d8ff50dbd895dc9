mod common;

use std::fs;

use common::{date, setup_test_env, temp_base};
use service_journal::{
    config::Config,
    domain::{Master, PaymentMethod},
    report::{self, ReportFormat, ReportScope},
    JournalError,
};

fn read_csv(path: &std::path::Path) -> String {
    let bytes = fs::read(path).expect("report written");
    assert!(bytes.starts_with("\u{feff}".as_bytes()), "csv starts with a BOM");
    String::from_utf8(bytes[3..].to_vec()).expect("utf-8 report")
}

#[test]
fn day_csv_lists_every_master_and_the_total() {
    let (mut journal, _config, _clock, _base) = setup_test_env(date(2024, 5, 22));
    journal
        .add_order(Master::Maksim, 1000.0, PaymentMethod::Cash, Some("Kia Rio"))
        .unwrap();
    journal.set_bonus(Master::Maksim, 10).unwrap();

    let out = temp_base().join("reports");
    let path = report::export(
        journal.state(),
        ReportScope::Day,
        ReportFormat::Csv,
        &out,
        &Config::default(),
    )
    .unwrap();

    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("Отчет_VIPавто_день_2024-05-22.csv")
    );
    let text = read_csv(&path);
    let lines: Vec<&str> = text.split("\r\n").filter(|line| !line.is_empty()).collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(
        lines[0],
        "Имя;Общая выручка;Премия, %;Доля Директора;З/П Мастера;Наличные;Карта"
    );
    assert_eq!(lines[1], "Владимир Ч.;0;0;0;0;0;0");
    assert_eq!(lines[3], "Максим;1000;10;450;550;1000;0");
    assert_eq!(lines[7], "ИТОГО;1000;;450;550;1000;0");
}

#[test]
fn week_csv_uses_archived_days_only() {
    let (mut journal, _config, clock, _base) = setup_test_env(date(2024, 5, 22));
    journal
        .add_order(Master::Artyom, 2000.0, PaymentMethod::Card, None)
        .unwrap();
    clock.set_date(date(2024, 5, 23));
    journal.sync().unwrap();
    journal
        .add_order(Master::Artyom, 999.0, PaymentMethod::Cash, None)
        .unwrap();

    let out = temp_base();
    let config = Config {
        shop_name: "Garage".into(),
        ..Config::default()
    };
    let path = report::export(
        journal.state(),
        ReportScope::Week,
        ReportFormat::Csv,
        &out,
        &config,
    )
    .unwrap();

    assert!(path.ends_with("Отчет_Garage_неделя.csv"));
    let text = read_csv(&path);
    assert!(text.contains("2024-05-22;Артём;2000;0;1000;1000\r\n"));
    assert!(text.contains("2024-05-22;ИТОГО ЗА ДЕНЬ;2000;;1000;1000\r\n"));
    assert!(!text.contains("999"));
}

#[test]
fn week_export_with_empty_archive_fails() {
    let (journal, _config, _clock, _base) = setup_test_env(date(2024, 5, 22));
    let out = temp_base();
    for format in [ReportFormat::Csv, ReportFormat::Pdf] {
        let err = report::export(
            journal.state(),
            ReportScope::Week,
            format,
            &out,
            &Config::default(),
        )
        .expect_err("nothing archived yet");
        assert!(matches!(err, JournalError::Export(_)), "{err}");
    }
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn day_pdf_without_a_font_is_refused() {
    let (mut journal, _config, _clock, _base) = setup_test_env(date(2024, 5, 22));
    journal
        .add_order(Master::Artyom, 1200.0, PaymentMethod::Card, None)
        .unwrap();

    let out = temp_base();
    let err = report::export(
        journal.state(),
        ReportScope::Day,
        ReportFormat::Pdf,
        &out,
        &Config::default(),
    )
    .expect_err("the built-in font has no Cyrillic");
    assert!(matches!(&err, JournalError::Export(message) if message.contains("pdf-font")), "{err}");
    assert!(!out.join("Отчет_VIPавто_день_2024-05-22.pdf").exists());
}

#[test]
fn export_does_not_roll_the_day_over() {
    let (mut journal, _config, clock, _base) = setup_test_env(date(2024, 5, 22));
    journal
        .add_order(Master::Andrey, 300.0, PaymentMethod::Cash, None)
        .unwrap();
    clock.set_date(date(2024, 5, 23));

    let path = report::export(
        journal.state(),
        ReportScope::Day,
        ReportFormat::Csv,
        &temp_base(),
        &Config::default(),
    )
    .unwrap();
    assert!(path.to_string_lossy().contains("2024-05-22"));
    assert!(journal.history().is_empty());
    assert_eq!(journal.today().order_count(), 1);
}
