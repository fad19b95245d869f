use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Upper-case alphanumeric reference such as `JSK8F2K1QZ0A`.
pub fn generate_reference(prefix: &str, length: usize) -> String {
    let body: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();
    format!("{}{}", prefix, body.to_ascii_uppercase())
}
