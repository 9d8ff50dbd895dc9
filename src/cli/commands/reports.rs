use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::DayTotals;
use crate::currency::{format_date_ru, format_rubles};
use crate::report::{self, ReportFormat, ReportScope};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show today's totals per master and for the shop",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "history",
            "Show archived days of the current week",
            "history",
            cmd_history,
        ),
        CommandEntry::new(
            "export",
            "Write a CSV or PDF report",
            "export <day|week> <csv|pdf> [dir]",
            cmd_export,
        ),
    ]
}

/// Per-master table of a day's totals with the shop total as footer.
pub fn day_table(totals: &DayTotals) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("Мастер"),
        TableColumn::right("Заказы"),
        TableColumn::right("Выручка"),
        TableColumn::right("Премия"),
        TableColumn::right("З/П Мастера"),
        TableColumn::right("Доля Директора"),
        TableColumn::right("Наличные"),
        TableColumn::right("Карта"),
    ]);
    for (master, d) in totals.masters.iter() {
        table.push(vec![
            master.display_name().to_string(),
            d.order_count.to_string(),
            format_rubles(d.total_amount),
            format!("{}%", d.bonus_percent),
            format_rubles(d.master_share),
            format_rubles(d.director_share),
            format_rubles(d.cash),
            format_rubles(d.card),
        ]);
    }
    let service = totals.service;
    let orders: usize = totals.masters.values().map(|d| d.order_count).sum();
    table.push_footer(vec![
        "ИТОГО".to_string(),
        orders.to_string(),
        format_rubles(service.total),
        String::new(),
        format_rubles(service.master_total),
        format_rubles(service.director_total),
        format_rubles(service.cash),
        format_rubles(service.card),
    ]);
    table
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.journal.sync()?;
    let totals = context.journal.day_totals();
    output_section(format!(
        "Summary for {}",
        format_date_ru(context.journal.current_date())
    ));
    io::print_table(&day_table(&totals), "No masters on the roster.");
    io::print_info(format!(
        "Director ({}): {}",
        context.config.director_name,
        format_rubles(totals.service.director_total)
    ));
    Ok(())
}

fn cmd_history(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.journal.sync()?;
    let days = context.journal.history_totals();
    output_section("This week");
    if days.is_empty() {
        io::print_info("No archived days yet.");
        return Ok(());
    }
    for (date, totals) in days.iter().rev() {
        io::print_info(format!(
            "{}  выручка {}  директор {}  мастера {}",
            format_date_ru(*date),
            format_rubles(totals.service.total),
            format_rubles(totals.service.director_total),
            format_rubles(totals.service.master_total)
        ));
        for (master, d) in totals.with_revenue() {
            io::print_info(format!(
                "    {:<12} {} ({}%) -> {}",
                master.display_name(),
                format_rubles(d.total_amount),
                d.bonus_percent,
                format_rubles(d.master_share)
            ));
        }
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (scope, format, dir) = match args {
        [scope, format] => (scope, format, None),
        [scope, format, dir] => (scope, format, Some(*dir)),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: export <day|week> <csv|pdf> [dir]".into(),
            ))
        }
    };
    let scope: ReportScope = scope.parse()?;
    let format: ReportFormat = format.parse()?;
    let dir = dir
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| context.export_dir());

    let path = report::export(
        context.journal.state(),
        scope,
        format,
        &dir,
        &context.config,
    )?;
    io::print_success(format!("Report written to {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute_day_totals;
    use crate::domain::{DayLedger, Master, Order, PaymentMethod};
    use chrono::NaiveDate;

    #[test]
    fn day_table_has_roster_rows_and_a_total_footer() {
        let mut day = DayLedger::new();
        let at = NaiveDate::from_ymd_opt(2024, 5, 22)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        day.add_order(
            Master::Danila,
            Order::new(1200.0, PaymentMethod::Card, None, at).unwrap(),
        );

        let table = day_table(&compute_day_totals(&day));
        assert_eq!(table.rows.len(), Master::ROSTER.len() + 1);
        assert_eq!(table.footer_from, Some(Master::ROSTER.len()));
        let footer = table.rows.last().unwrap();
        assert_eq!(footer[0], "ИТОГО");
        assert_eq!(footer[1], "1");
        assert_eq!(footer[7], "1\u{a0}200\u{a0}₽");
    }
}
