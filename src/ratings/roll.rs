/// Roll signature used for items without selectable perks
pub const FIXED_ROLL: &str = "fixed";

/// Perk hashes joined with commas, in the order the service reported them.
pub fn roll_signature(available_perks: Option<&[u32]>) -> String {
    match available_perks {
        Some(perks) if !perks.is_empty() => perks
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(","),
        _ => FIXED_ROLL.to_string(),
    }
}
