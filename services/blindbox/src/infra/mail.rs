use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::repository::MailSender;
use crate::error::BlindBoxError;

/// Plain-text mail over SMTP.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let host = config.smtp_host.as_str();
        let port = config.smtp_port;
        let mut builder = if config.smtp_tls {
            let tls_params = TlsParameters::new(host.to_owned())?;
            // 465 is implicit TLS; anything else upgrades with STARTTLS.
            if port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
                    .port(port)
                    .tls(Tls::Wrapper(tls_params))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
                    .port(port)
                    .tls(Tls::Required(tls_params))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port)
        };

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.mail_from.parse()?,
        })
    }
}

impl MailSender for SmtpMailer {
    async fn send(&self, subject: &str, body: &str, to: &[String]) -> Result<(), BlindBoxError> {
        let mut message = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for recipient in to {
            let mailbox: Mailbox = recipient
                .parse()
                .map_err(|e| BlindBoxError::MailFailed(format!("invalid recipient: {e}")))?;
            message = message.to(mailbox);
        }
        let message = message
            .body(body.to_owned())
            .map_err(|e| BlindBoxError::MailFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| BlindBoxError::MailFailed(e.to_string()))?;
        debug!(recipients = to.len(), "mail sent");
        Ok(())
    }
}
