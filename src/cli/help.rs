use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::domain::Master;

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Commands");
    let entries = registry.list();
    let width = entries
        .iter()
        .map(|entry| entry.name.len())
        .max()
        .unwrap_or(0);
    for entry in entries {
        io::print_info(format!(
            "  {:<width$}  {}",
            entry.name,
            entry.description,
            width = width
        ));
    }
    io::print_hint("`help <command>` shows the usage line.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("{} - {}", entry.name, entry.description));
    io::print_info(format!("  usage: {}", entry.usage));
    if entry.usage.contains("<master>") {
        io::print_info(format!("  masters: {}", master_handles()));
    }
}

/// `1 Владимир Ч. (vladimir-ch), 2 ...`
fn master_handles() -> String {
    Master::ROSTER
        .iter()
        .map(|master| {
            format!(
                "{} {} ({})",
                master.position() + 1,
                master.display_name(),
                master.alias()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_cover_the_whole_roster() {
        let handles = master_handles();
        assert!(handles.starts_with("1 Владимир Ч. (vladimir-ch)"));
        assert!(handles.ends_with("6 Артём (artyom)"));
    }
}
