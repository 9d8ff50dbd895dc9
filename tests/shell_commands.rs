mod common;

use common::{date, setup_test_env, temp_base};
use service_journal::{
    cli::{CliMode, CommandError, ShellContext},
    domain::Master,
    JournalError,
};

fn script_shell() -> ShellContext {
    let (journal, config_manager, _clock, _base) = setup_test_env(date(2024, 5, 22));
    let config = config_manager.load().expect("default config");
    ShellContext::with_parts(CliMode::Script, journal, config, config_manager)
}

#[test]
fn order_commands_change_the_journal() {
    let mut shell = script_shell();
    assert!(shell.process_line("add 3 1000 cash Kia Rio").unwrap());
    assert!(shell.process_line("add maksim 250,5 card").unwrap());
    assert!(shell.process_line("bonus Максим 4%").unwrap());

    let today = shell.journal.today();
    assert_eq!(today.orders_of(Master::Maksim).len(), 2);
    assert_eq!(today.bonus_of(Master::Maksim).value(), 4);
    assert_eq!(
        today.orders_of(Master::Maksim)[0].vehicle.as_deref(),
        Some("Kia Rio")
    );

    assert!(shell.process_line("remove maksim 1").unwrap());
    let remaining = shell.journal.today().orders_of(Master::Maksim);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].amount, 250.5);
}

#[test]
fn invalid_values_surface_as_journal_errors() {
    let mut shell = script_shell();
    let err = shell.process_line("bonus andrey 21").unwrap_err();
    assert!(matches!(err, CommandError::Journal(JournalError::Validation(_))));

    let err = shell.process_line("add andrey 0 cash").unwrap_err();
    assert!(matches!(err, CommandError::Journal(JournalError::Validation(_))));

    let err = shell.process_line("remove andrey 1").unwrap_err();
    assert!(matches!(
        err,
        CommandError::Journal(JournalError::IndexOutOfRange { .. })
    ));

    let err = shell.process_line("add andrey").unwrap_err();
    assert!(matches!(err, CommandError::InvalidArguments(_)));
    assert!(shell.journal.today().is_empty());
}

#[test]
fn config_changes_are_saved() {
    let mut shell = script_shell();
    assert!(shell.process_line("config set shop-name Garage Pro").unwrap());
    assert_eq!(shell.config.shop_name, "Garage Pro");

    let reloaded = shell.config_manager.load().unwrap();
    assert_eq!(reloaded.shop_name, "Garage Pro");

    let err = shell.process_line("config set colour blue").unwrap_err();
    assert!(matches!(err, CommandError::Journal(JournalError::Config(_))));
}

#[test]
fn export_writes_into_the_given_directory() {
    let mut shell = script_shell();
    shell.process_line("add danila 800 cash").unwrap();
    let out = temp_base();
    let line = format!("export day csv '{}'", out.display());
    assert!(shell.process_line(&line).unwrap());
    assert!(out.join("Отчет_VIPавто_день_2024-05-22.csv").exists());
}

#[test]
fn exit_stops_the_loop() {
    let mut shell = script_shell();
    assert!(shell.process_line("unknown-command").unwrap());
    assert!(!shell.process_line("exit").unwrap());
    assert!(!shell.running);
}
