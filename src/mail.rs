use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;
use crate::error::WatchError;

#[allow(async_fn_in_trait)]
pub trait Mailer {
    async fn send(&self, subject: &str, text: &str, html: &str) -> Result<(), WatchError>;
}

fn parse_mailbox(address: &str) -> Result<Mailbox, WatchError> {
    address
        .trim()
        .parse()
        .map_err(|e| WatchError::InvalidAddress(format!("\"{address}\": {e}")))
}

/// How the SMTP connection is secured. Port 465 speaks TLS from the first
/// byte; anything else (587, 25) starts in plain text and upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    ImplicitTls,
    StartTls,
}

impl SmtpSecurity {
    pub fn for_port(port: u16) -> Self {
        if port == 465 {
            Self::ImplicitTls
        } else {
            Self::StartTls
        }
    }
}

/// Sends over SMTP, secured per [`SmtpSecurity::for_port`]. Building it does
/// not open a connection.
pub struct SmtpMailer {
    sender: Mailbox,
    recipients: Vec<Mailbox>,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig, recipients: &[String]) -> Result<Self, WatchError> {
        let sender = parse_mailbox(&config.sender)?;
        let recipients = recipients
            .iter()
            .map(|r| parse_mailbox(r))
            .collect::<Result<Vec<_>, _>>()?;
        if recipients.is_empty() {
            return Err(WatchError::MissingArgument("--email"));
        }

        let creds = Credentials::new(config.user.clone(), config.password.clone());
        let relay = match SmtpSecurity::for_port(config.port) {
            SmtpSecurity::ImplicitTls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host),
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            }
        };
        let transport = relay
            .map_err(|e| WatchError::Mail(format!("invalid SMTP relay {}: {e}", config.host)))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            sender,
            recipients,
            transport,
        })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, subject: &str, text: &str, html: &str) -> Result<(), WatchError> {
        let mut builder = Message::builder().from(self.sender.clone());
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }
        let message = builder
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                text.to_string(),
                html.to_string(),
            ))
            .map_err(|e| WatchError::Mail(e.to_string()))?;

        tracing::info!(
            "sending \"{subject}\" to {} recipient(s)",
            self.recipients.len()
        );
        self.transport
            .send(message)
            .await
            .map_err(|e| WatchError::Mail(e.to_string()))?;
        tracing::info!("mail accepted by SMTP relay");
        Ok(())
    }
}
