//! Process configuration, read once from the environment at start-up.

pub mod game;
pub mod server;

pub use game::GameConfig;
pub use server::ServerConfig;

/// Parse an optional variable, falling back to `default` when unset or blank.
fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, crate::AppError> {
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map_err(|_| {
            crate::AppError::config(format!("{name} has an invalid value: '{raw}'"))
        }),
        _ => Ok(default),
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
