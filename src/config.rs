use crate::error::WatchError;

pub const DEFAULT_API_URL: &str = "https://api.transavia.com/v1/flightoffers/";
pub const DEFAULT_SMTP_PORT: u16 = 465;

pub const API_KEY_VAR: &str = "FLIGHT_API_KEY";
pub const API_URL_VAR: &str = "FLIGHT_API_URL";
pub const SMTP_HOST_VAR: &str = "SMTP_HOST";
pub const SMTP_PORT_VAR: &str = "SMTP_PORT";
pub const SMTP_USER_VAR: &str = "SMTP_USER";
pub const SMTP_PASSWORD_VAR: &str = "SMTP_PASSWORD";
pub const MAIL_FROM_VAR: &str = "MAIL_FROM";

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub sender: String,
}

/// Process-wide settings, read once at startup and handed to the scan and
/// the mailer.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub mail: Option<MailConfig>,
    missing_mail: Vec<&'static str>,
}

impl Config {
    pub fn from_env() -> Result<Self, WatchError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(WatchError::MissingEnv(vec![API_KEY_VAR]))?;
        let api_url = get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let port = match get(SMTP_PORT_VAR) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                WatchError::Validation(format!("{SMTP_PORT_VAR} must be a port number, got \"{raw}\""))
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        let host = get(SMTP_HOST_VAR);
        let user = get(SMTP_USER_VAR);
        let password = get(SMTP_PASSWORD_VAR);

        let mut missing_mail = Vec::new();
        if host.is_none() {
            missing_mail.push(SMTP_HOST_VAR);
        }
        if user.is_none() {
            missing_mail.push(SMTP_USER_VAR);
        }
        if password.is_none() {
            missing_mail.push(SMTP_PASSWORD_VAR);
        }

        let mail = match (host, user, password) {
            (Some(host), Some(user), Some(password)) => Some(MailConfig {
                sender: get(MAIL_FROM_VAR).unwrap_or_else(|| user.clone()),
                host,
                port,
                user,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            api_key,
            api_url,
            mail,
            missing_mail,
        })
    }

    pub fn require_mail(&self) -> Result<&MailConfig, WatchError> {
        self.mail
            .as_ref()
            .ok_or_else(|| WatchError::MissingEnv(self.missing_mail.clone()))
    }
}
