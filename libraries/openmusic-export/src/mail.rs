/// Outbound mail for delivered exports
use crate::error::MailError;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::Deserialize;

/// One export email with its JSON attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

/// Sends export mails
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: ExportMail) -> Result<(), MailError>;
}

/// Check that `email` is a syntactically valid address
pub fn validate_email(email: &str) -> Result<(), MailError> {
    email
        .parse::<Address>()
        .map(|_| ())
        .map_err(|e| MailError::InvalidAddress(format!("{}: {}", email, e)))
}

/// SMTP relay settings
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender mailbox, e.g. `OpenMusic <noreply@example.com>`
    pub from: String,
    /// Upgrade the connection with STARTTLS
    #[serde(default)]
    pub starttls: bool,
}

/// Mail transport over an SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|e| MailError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };

        let mut builder = builder.port(settings.port);
        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = settings
            .from
            .parse::<Mailbox>()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", settings.from, e)))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, mail: ExportMail) -> Result<Message, MailError> {
        let to = mail
            .to
            .parse::<Mailbox>()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", mail.to, e)))?;

        let content_type =
            ContentType::parse("application/json").map_err(|e| MailError::Build(e.to_string()))?;
        let attachment = Attachment::new(mail.attachment_name).body(mail.attachment, content_type);

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(mail.body))
                    .singlepart(attachment),
            )
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, mail: ExportMail) -> Result<(), MailError> {
        let message = self.build_message(mail)?;

        self.transport.send(message).await.map_err(|e| {
            if e.is_permanent() {
                MailError::Rejected(e.to_string())
            } else {
                MailError::Transport(e.to_string())
            }
        })?;

        Ok(())
    }
}
