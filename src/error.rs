use std::fmt;

#[derive(Debug)]
pub enum WatchError {
    MissingArgument(&'static str),
    MissingEnv(Vec<&'static str>),
    InvalidAirport(String),
    InvalidDate(String),
    InvalidHourRange(String),
    InvalidAddress(String),
    Validation(String),
    Timeout,
    ConnectionFailed(String),
    DnsResolution(String),
    ProxyError(String),
    TlsError(String),
    HttpStatus { status: u16, body: String },
    JsonParse { detail: String, body: String },
    Mail(String),
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument(flag) => write!(f, "{flag} is required"),
            Self::MissingEnv(vars) => write!(
                f,
                "missing environment variable(s): {}",
                vars.join(", ")
            ),
            Self::InvalidAirport(code) => write!(
                f,
                "invalid airport code \"{code}\" (must be exactly 3 letters, e.g. ORY, LIS, AMS)"
            ),
            Self::InvalidDate(date) => write!(
                f,
                "invalid date \"{date}\" (must be YYYYMMDD, e.g. 20240601)"
            ),
            Self::InvalidHourRange(range) => write!(
                f,
                "invalid hour range \"{range}\" (must be H-H with 0 <= start <= end <= 24, e.g. 9-17)"
            ),
            Self::InvalidAddress(detail) => write!(f, "invalid email address: {detail}"),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::Timeout => write!(
                f,
                "request timed out. Try increasing --timeout or check your connection"
            ),
            Self::ConnectionFailed(detail) => write!(
                f,
                "connection failed. Check your internet connection ({detail})"
            ),
            Self::DnsResolution(host) => write!(
                f,
                "DNS resolution failed for {host}. Check your internet connection"
            ),
            Self::ProxyError(detail) => write!(
                f,
                "proxy error. Check your --proxy URL is correct ({detail})"
            ),
            Self::TlsError(detail) => write!(f, "TLS/SSL error ({detail})"),
            Self::HttpStatus { status, body } => {
                write!(f, "unexpected HTTP status {status} from the flight API")?;
                if !body.is_empty() {
                    write!(f, ": {body}")?;
                }
                Ok(())
            }
            Self::JsonParse { detail, body } => write!(
                f,
                "failed to decode flight offers from response: {detail}: {body}"
            ),
            Self::Mail(detail) => write!(f, "failed to send email: {detail}"),
        }
    }
}

impl std::error::Error for WatchError {}

pub fn from_http_error(err: wreq::Error) -> WatchError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if err.is_timeout() {
        return WatchError::Timeout;
    }

    if err.is_connect() {
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("getaddrinfo") {
            return WatchError::DnsResolution(msg);
        }
        return WatchError::ConnectionFailed(msg);
    }

    if lower.contains("proxy") || lower.contains("socks") {
        return WatchError::ProxyError(msg);
    }

    if lower.contains("tls") || lower.contains("ssl") || lower.contains("certificate") {
        return WatchError::TlsError(msg);
    }

    WatchError::ConnectionFailed(msg)
}
