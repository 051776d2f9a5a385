use rand::Rng;

/// Random 128-bit id rendered in the familiar 8-4-4-4-12 hex grouping.
pub fn generate_opaque_id() -> String {
    let mut rng = rand::rng();
    let bits: u128 = rng.random();
    let hex = format!("{:032x}", bits);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
