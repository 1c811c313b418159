/// Canonical form of a participant name: surrounding whitespace removed, lower-cased.
///
/// Applied to every sender and recipient, on write and on lookup. Never to bodies.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
