use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::config::CONFIG_KEYS;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "reset",
            "Clear today and the week archive (a backup is kept)",
            "reset",
            cmd_reset,
        ),
        CommandEntry::new(
            "backups",
            "List stored journal backups, newest first",
            "backups",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Replace the journal with a backup",
            "restore <backup>",
            cmd_restore,
        ),
        CommandEntry::new(
            "config",
            "Show or change settings",
            "config [show | set <key> <value>]",
            cmd_config,
        ),
    ]
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Delete all of today's orders and the week archive?")? {
        io::print_info("Reset cancelled.");
        return Ok(());
    }
    match context.journal.reset_all()? {
        Some(backup) => io::print_success(format!("Journal cleared; previous data saved as {}.", backup.name)),
        None => io::print_success("Journal cleared."),
    }
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.journal.backups()?;
    output_section("Backups");
    if backups.is_empty() {
        io::print_info("No backups yet.");
        return Ok(());
    }
    for (idx, backup) in backups.iter().enumerate() {
        let note = backup
            .note
            .as_deref()
            .map(|note| format!(" ({})", note))
            .unwrap_or_default();
        io::print_info(format!(
            "  {:>2}. {}  {}{}",
            idx + 1,
            backup.name,
            backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            note
        ));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: restore <backup>".into(),
        ));
    };
    let name = resolve_backup(context, reference)?;
    if !context.confirm(&format!("Replace the journal with {}?", name))? {
        io::print_info("Restore cancelled.");
        return Ok(());
    }
    context.journal.restore_backup(&name)?;
    io::print_success(format!(
        "Restored {} ({} orders today, {} archived days).",
        name,
        context.journal.today().order_count(),
        context.journal.history().len()
    ));
    Ok(())
}

/// A backup can be named directly or by its number in `backups`.
fn resolve_backup(context: &ShellContext, reference: &str) -> Result<String, CommandError> {
    let Ok(position) = reference.parse::<usize>() else {
        return Ok(reference.to_string());
    };
    let backups = context.journal.backups()?;
    position
        .checked_sub(1)
        .and_then(|idx| backups.get(idx))
        .map(|backup| backup.name.clone())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "no backup #{} (there are {})",
                position,
                backups.len()
            ))
        })
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output_section("Configuration");
            io::print_info(&context.config);
            io::print_info(format!("  (stored in {})", context.config_manager.path().display()));
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            let value = value.join(" ");
            context.config.set(key, &value)?;
            context.persist_config()?;
            io::print_success(format!("{} updated.", key));
            if *key == "backup-retention" {
                io::print_hint("Backup retention applies from the next start.");
            }
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(format!(
            "usage: config [show | set <key> <value>] (keys: {})",
            CONFIG_KEYS.join(", ")
        ))),
    }
}
