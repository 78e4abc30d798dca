use uuid::Uuid;

pub const TOURIST_ID_PREFIX: &str = "TID-";
const TOURIST_ID_HEX_LEN: usize = 8;

pub fn generate_tourist_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}{}", TOURIST_ID_PREFIX, &hex[..TOURIST_ID_HEX_LEN])
}

pub fn is_tourist_id(candidate: &str) -> bool {
    match candidate.strip_prefix(TOURIST_ID_PREFIX) {
        Some(rest) => rest.len() == TOURIST_ID_HEX_LEN && rest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
        None => false,
    }
}
