// SPDX-License-Identifier: MIT

//! Outbound OTP email delivery.
//!
//! The SMTP transport is built once at startup and shared. Delivery failure
//! is a hard failure of the operation that triggered it; the caller recovers
//! by requesting a resend.

use crate::config::Config;
use crate::error::AppError;
use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Delivery contract for OTP codes. Tests inject a recording mock.
#[async_trait]
pub trait OtpMailer: Send + Sync {
    async fn send_otp(&self, email: &str, name: &str, otp: &str) -> Result<(), AppError>;
}

/// SMTP-backed mailer.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport once from configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .context("failed building SMTP transport")?
            .credentials(credentials)
            .build();

        let from = config
            .email_from
            .parse()
            .context("invalid EMAIL_FROM address")?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl OtpMailer for SmtpMailer {
    async fn send_otp(&self, email: &str, name: &str, otp: &str) -> Result<(), AppError> {
        let to: Mailbox = email
            .parse()
            .map_err(|_| AppError::Dependency(format!("unroutable recipient: {email}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("HD Notes - Verify Your Account")
            .header(ContentType::TEXT_HTML)
            .body(otp_email_body(name, otp))
            .map_err(|e| AppError::Dependency(format!("failed building OTP email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Dependency(format!("SMTP delivery failed: {e}")))?;

        tracing::info!(recipient = %email, "OTP email sent");
        Ok(())
    }
}

/// HTML body for the verification email. The code itself is never logged.
fn otp_email_body(name: &str, otp: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h1>HD Notes</h1>
      <h2>Hello {name}!</h2>
      <p>To continue, please use the following One-Time Password (OTP):</p>
      <div style="background: #f3f4f6; padding: 20px; text-align: center; border-radius: 8px;">
        <div style="font-size: 32px; font-weight: bold; letter-spacing: 8px;">{otp}</div>
        <p style="color: #6b7280;">This code will expire in 10 minutes</p>
      </div>
      <p>If you didn't request this code, please ignore this email.</p>
      <p>Best regards,<br>The HD Notes Team</p>
    </div>
  </body>
</html>"#
    )
}
