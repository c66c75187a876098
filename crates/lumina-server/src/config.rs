use lumina_model::Email;
use lumina_payments::DEFAULT_STRIPE_BASE_URL;

/// Server configuration, normally assembled from `LUMINA_*` environment
/// variables in `main`. The defaults exist for local runs only; `main` warns
/// when the secret-bearing ones are still in play.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub db_path: std::path::PathBuf,
    pub jwt_secret: String,
    pub stripe_secret_key: String,
    pub stripe_base_url: String,
    /// The single designated bootstrap administrator identity: an account
    /// signing up with this email is granted the admin role. The gates only
    /// ever consult the stored role.
    pub bootstrap_admin_email: Option<Email>,
    pub currency: String,
    pub max_body_bytes: usize,
}

pub const INSECURE_JWT_SECRET: &str = "replace_this_with_a_strong_secret";
pub const PLACEHOLDER_STRIPE_KEY: &str = "sk_test_placeholder";

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:4000".to_string(),
            db_path: std::path::PathBuf::from("lumina.sqlite"),
            jwt_secret: INSECURE_JWT_SECRET.to_string(),
            stripe_secret_key: PLACEHOLDER_STRIPE_KEY.to_string(),
            stripe_base_url: DEFAULT_STRIPE_BASE_URL.to_string(),
            bootstrap_admin_email: Email::parse("admin@lumina.com").ok(),
            currency: "usd".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Config {
    #[must_use]
    pub fn is_bootstrap_admin(&self, email: &Email) -> bool {
        self.bootstrap_admin_email.as_ref() == Some(email)
    }
}
