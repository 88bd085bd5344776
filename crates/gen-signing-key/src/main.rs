use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::RngCore;

fn main() {
    let mut key = [0u8; 64];
    rand::rng().fill_bytes(&mut key);
    let encoded_key = STANDARD.encode(key);
    println!("HS256 token signing secret (Base-64 encoded): {encoded_key}");
}
