/**
 * Password-Reset Mail
 *
 * With `SMTP_HOST` configured, mail goes out over STARTTLS through
 * `lettre`'s async transport. Without it the reset link is written to the
 * log so a local setup still works end to end.
 */

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::config::MailSettings;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Outgoing mail backend
pub enum Mailer {
    Smtp {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
    },
    /// Log the message instead of sending it
    Log,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mailer::Smtp { from, .. } => f.debug_struct("Smtp").field("from", from).finish_non_exhaustive(),
            Mailer::Log => f.write_str("Log"),
        }
    }
}

impl Mailer {
    pub fn from_settings(settings: &MailSettings) -> BackendResult<Self> {
        let Some(host) = &settings.smtp_host else {
            tracing::warn!("SMTP_HOST not set; password-reset links will only be logged");
            return Ok(Mailer::Log);
        };

        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| BackendError::Mail(format!("MAIL_FROM inválido: {}", e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| BackendError::Mail(e.to_string()))?
            .port(settings.smtp_port);
        if let (Some(user), Some(password)) = (&settings.smtp_user, &settings.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        tracing::info!("SMTP mailer configured for {}:{}", host, settings.smtp_port);
        Ok(Mailer::Smtp {
            transport: builder.build(),
            from,
        })
    }

    /// Send the password-reset link to `to`
    pub async fn send_password_reset(&self, to: &str, link: &str) -> BackendResult<()> {
        match self {
            Mailer::Log => {
                tracing::info!("[Mail] Password reset for {}: {}", to, link);
                Ok(())
            }
            Mailer::Smtp { transport, from } => {
                let to: Mailbox = to
                    .parse()
                    .map_err(|e| BackendError::Mail(format!("destinatario inválido: {}", e)))?;
                let message = Message::builder()
                    .from(from.clone())
                    .to(to)
                    .subject("Restablecer contraseña")
                    .header(ContentType::TEXT_PLAIN)
                    .body(reset_body(link))
                    .map_err(|e| BackendError::Mail(e.to_string()))?;

                transport
                    .send(message)
                    .await
                    .map_err(|e| BackendError::Mail(e.to_string()))?;
                tracing::info!("[Mail] Password reset mail sent");
                Ok(())
            }
        }
    }
}

fn reset_body(link: &str) -> String {
    format!(
        "Has solicitado restablecer tu contraseña.\n\n\
         Abre este enlace en la próxima hora para elegir una nueva:\n{}\n\n\
         Si no lo has solicitado, ignora este mensaje.\n",
        link
    )
}
