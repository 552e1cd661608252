use lettre::{
    Message, SmtpTransport, Transport,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::IntegrationError;

/// Outgoing mail over authenticated SMTP with STARTTLS.
#[derive(Clone)]
pub struct Mailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl Mailer {
    pub fn new(
        host: &str,
        port: u16,
        username: String,
        password: String,
        from: &str,
    ) -> Result<Self, IntegrationError> {
        let from = from
            .parse::<Mailbox>()
            .map_err(|err| IntegrationError::Mail(format!("invalid sender address: {err}")))?;
        let transport = SmtpTransport::starttls_relay(host)
            .map_err(|err| IntegrationError::Mail(err.to_string()))?
            .port(port)
            .credentials(Credentials::new(username, password))
            .build();
        Ok(Self { transport, from })
    }

    /// Mails the verification code for a fresh registration. SMTP io
    /// is blocking, so the send runs on the blocking pool.
    pub async fn send_otp(&self, to: &str, otp: &str) -> Result<(), IntegrationError> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|err| IntegrationError::Mail(format!("invalid recipient address: {err}")))?;
        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Verify your email address")
            .header(ContentType::TEXT_PLAIN)
            .body(otp_body(otp))
            .map_err(|err| IntegrationError::Mail(err.to_string()))?;

        tracing::debug!("sending verification code mail");
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|err| IntegrationError::Mail(err.to_string()))?
            .map_err(|err| IntegrationError::Mail(err.to_string()))?;
        Ok(())
    }
}

fn otp_body(otp: &str) -> String {
    format!(
        "Your verification code is {otp}.\n\n\
         It expires in 5 minutes. If you did not sign up, you can\n\
         ignore this mail.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_body_carries_the_code() {
        let body = otp_body("042137");
        assert!(body.contains("042137"));
        assert!(body.contains("5 minutes"));
    }
}
