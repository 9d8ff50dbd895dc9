pub mod data;
pub mod orders;
pub mod reports;
pub mod system;

use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(orders::definitions());
    commands.extend(reports::definitions());
    commands.extend(data::definitions());
    commands.extend(system::definitions());
    commands
}
