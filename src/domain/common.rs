use uuid::Uuid;

/// Journal records that keep a stable id across saves and backups.
pub trait Identifiable {
    fn id(&self) -> Uuid;

    /// First eight hex digits, enough to tell orders apart in the shell.
    fn short_id(&self) -> String {
        let mut id = self.id().simple().to_string();
        id.truncate(8);
        id
    }
}

/// One-line rendering used by shell listings and confirmations.
pub trait Displayable {
    fn display_label(&self) -> String;
}
