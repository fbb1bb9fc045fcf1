pub mod pgs;
pub mod rs;

/// Parses `"{prefix}{digits}"` into the numeric suffix, e.g.
/// `numeric_id("PGS000001", "PGS", "...")` -> `Ok(1)`.
fn numeric_id(s: &str, prefix: &str, expected: &str) -> Result<u64, std::io::Error> {
    let Some(rest) = s.strip_prefix(prefix) else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{expected}, but the value does not start with '{prefix}'. Value found: '{s}'."),
        ));
    };
    if !rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{expected}, but found invalid value. Value found: '{s}'."),
        ));
    }
    rest.parse().map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{expected}, but the value is not an integer after '{prefix}'. Value found: '{s}'."),
        )
    })
}
