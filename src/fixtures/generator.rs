use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const LOGIN_LEN: usize = 12;
const PASSWORD_LEN: usize = 16;
const LOGIN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Source of fresh login and password strings
pub trait CredentialSource: Send + Sync {
    fn login(&self) -> String;

    fn password(&self) -> String;
}

/// Thread-RNG backed credentials, different on every run
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCredentials;

impl CredentialSource for RandomCredentials {
    fn login(&self) -> String {
        login_from(&mut rand::rng())
    }

    fn password(&self) -> String {
        password_from(&mut rand::rng())
    }
}

/// Reproducible credentials: the same seed yields the same sequence
pub struct SeededCredentials {
    rng: Mutex<StdRng>,
}

impl SeededCredentials {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic while holding the lock cannot leave the RNG in a bad state
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl CredentialSource for SeededCredentials {
    fn login(&self) -> String {
        self.with_rng(login_from)
    }

    fn password(&self) -> String {
        self.with_rng(password_from)
    }
}

/// Lowercase login starting with a letter, e.g. `k3v9xq0aj2lm`
fn login_from<R: Rng>(rng: &mut R) -> String {
    let mut login = String::with_capacity(LOGIN_LEN);
    login.push(rng.random_range(b'a'..=b'z') as char);
    for _ in 1..LOGIN_LEN {
        let idx = rng.random_range(0..LOGIN_ALPHABET.len());
        login.push(LOGIN_ALPHABET[idx] as char);
    }
    login
}

fn password_from<R: Rng>(rng: &mut R) -> String {
    (0..PASSWORD_LEN)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect()
}
