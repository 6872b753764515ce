use rand::distributions::Alphanumeric;
use rand::Rng;

/// Creates a random alphanumeric secret, used for example for the
/// bearer secret protecting the scheduled delivery job endpoint
pub fn create_random_secret(secret_len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect()
}
