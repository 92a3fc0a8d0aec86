pub mod lobby;
pub mod notifications;
pub mod room;
