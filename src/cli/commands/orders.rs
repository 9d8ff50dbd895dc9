use crate::cli::core::{
    parse_amount, parse_master, parse_percent, parse_position, CommandError, CommandResult,
    ShellContext,
};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::currency::format_rubles;
use crate::domain::{Displayable, Identifiable, Master, PaymentMethod};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "masters",
            "List the roster with numbers and aliases",
            "masters",
            cmd_masters,
        ),
        CommandEntry::new(
            "add",
            "Record an order for a master",
            "add <master> <amount> <cash|card> [vehicle...]",
            cmd_add,
        ),
        CommandEntry::new(
            "remove",
            "Delete an order by its number in `orders`",
            "remove <master> <n>",
            cmd_remove,
        ),
        CommandEntry::new(
            "bonus",
            "Set a master's bonus for today (0-20%)",
            "bonus <master> <percent>",
            cmd_bonus,
        ),
        CommandEntry::new(
            "orders",
            "Show today's orders, numbered per master",
            "orders [master]",
            cmd_orders,
        ),
    ]
}

fn cmd_masters(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.journal.sync()?;
    let today = context.journal.today();
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Мастер"),
        TableColumn::left("Alias"),
        TableColumn::right("Премия"),
        TableColumn::right("Заказы"),
    ]);
    for master in Master::ROSTER {
        table.push(vec![
            (master.position() + 1).to_string(),
            master.display_name().to_string(),
            master.alias().to_string(),
            today.bonus_of(master).to_string(),
            today.orders_of(master).len().to_string(),
        ]);
    }
    output_section("Masters");
    io::print_table(&table, "The roster is empty.");
    io::print_info(format!("Director: {}", context.config.director_name));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [master, amount, payment, vehicle @ ..] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: add <master> <amount> <cash|card> [vehicle...]".into(),
        ));
    };
    let master = parse_master(master)?;
    let amount = parse_amount(amount)?;
    let payment: PaymentMethod = payment.parse()?;
    let vehicle = vehicle.join(" ");
    let vehicle = (!vehicle.trim().is_empty()).then_some(vehicle.as_str());

    context.journal.add_order(master, amount, payment, vehicle)?;
    let count = context.journal.today().orders_of(master).len();
    io::print_success(format!(
        "{}: order #{} for {} ({})",
        master,
        count,
        format_rubles(amount),
        payment.label()
    ));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [master, position] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: remove <master> <n>".into(),
        ));
    };
    let master = parse_master(master)?;
    let index = parse_position(position)?;
    if let Some(label) = removal_preview(context, master, index)? {
        if !context.confirm(&format!("Delete {} order {}?", master, label))? {
            io::print_info("Nothing deleted.");
            return Ok(());
        }
    }

    let removed = context.journal.remove_order(master, index)?;
    io::print_success(format!(
        "{}: removed {} [{}]",
        master,
        removed.display_label(),
        removed.short_id()
    ));
    Ok(())
}

/// Label of the order `remove` would delete, read after the day has rolled
/// over so the confirmation never shows yesterday's listing.
fn removal_preview(
    context: &mut ShellContext,
    master: Master,
    index: usize,
) -> Result<Option<String>, CommandError> {
    context.journal.sync()?;
    Ok(context
        .journal
        .today()
        .orders_of(master)
        .get(index)
        .map(|order| order.display_label()))
}

fn cmd_bonus(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [master, percent] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: bonus <master> <percent>".into(),
        ));
    };
    let master = parse_master(master)?;
    let percent = parse_percent(percent)?;
    let bonus = context.journal.set_bonus(master, percent)?;
    let totals = context.journal.day_totals();
    io::print_success(format!(
        "{}: bonus {} (master {}, director {})",
        master,
        bonus,
        format_rubles(totals.master(master).master_share),
        format_rubles(totals.master(master).director_share)
    ));
    Ok(())
}

fn cmd_orders(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let only = match args.first() {
        Some(raw) => Some(parse_master(raw)?),
        None => None,
    };
    context.journal.sync()?;
    let today = context.journal.today();
    output_section(format!(
        "Orders for {}",
        context.journal.current_date().format("%d.%m.%Y")
    ));
    let mut printed = false;
    for master in Master::ROSTER {
        if only.is_some_and(|wanted| wanted != master) {
            continue;
        }
        let orders = today.orders_of(master);
        if orders.is_empty() && only.is_none() {
            continue;
        }
        printed = true;
        io::print_info(format!("{} ({}):", master, today.bonus_of(master)));
        if orders.is_empty() {
            io::print_info("  no orders");
        }
        for (idx, order) in orders.iter().enumerate() {
            io::print_info(format!("  {:>2}. {}", idx + 1, order.display_label()));
        }
    }
    if !printed {
        io::print_info("No orders yet today.");
    }
    Ok(())
}
