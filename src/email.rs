use axum::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str, text: &str) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str, text: &str) -> anyhow::Result<()> {
        let Some(host) = self.config.host.as_deref() else {
            tracing::warn!(to = %to, subject = %subject, "smtp not configured, skipping email");
            return Ok(());
        };

        let from: Mailbox =
            format!("{} <{}>", self.config.from_name, self.config.from_address).parse()?;
        let to_mailbox: Mailbox = to.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        transport.send(message).await?;
        tracing::info!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}

pub const VERIFICATION_SUBJECT: &str = "Verify Your UniThrift Account";
pub const PASSWORD_RESET_SUBJECT: &str = "Reset Your UniThrift Password";

pub fn render_verification_email(name: &str, verify_url: &str) -> (String, String) {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<body style="margin:0;padding:0;background-color:#f5f5f5;font-family:-apple-system,'Segoe UI',Roboto,Arial,sans-serif;">
    <div style="max-width:560px;margin:0 auto;padding:40px 20px;">
        <div style="background:#ffffff;border-radius:8px;overflow:hidden;box-shadow:0 2px 8px rgba(0,0,0,0.06);">
            <div style="background:#16a34a;color:#ffffff;padding:28px 24px;text-align:center;">
                <h1 style="margin:0;font-size:22px;">Welcome to UniThrift</h1>
            </div>
            <div style="padding:32px 24px;color:#374151;line-height:1.6;">
                <p>Hi {name},</p>
                <p>Thanks for signing up. Confirm your campus email to start buying and selling on UniThrift.</p>
                <div style="text-align:center;margin:32px 0;">
                    <a href="{verify_url}" style="display:inline-block;background:#16a34a;color:#ffffff !important;text-decoration:none;padding:14px 32px;border-radius:6px;font-weight:500;">Verify Email</a>
                </div>
                <p style="color:#6b7280;font-size:13px;">This link will expire in 24 hours. If you didn't create a UniThrift account, you can safely ignore this email.</p>
            </div>
        </div>
    </div>
</body>
</html>"#,
        name = html_escape(name),
        verify_url = verify_url,
    );

    let text = format!(
        r#"Welcome to UniThrift

Hi {name},

Thanks for signing up. Confirm your campus email to start buying and selling on UniThrift:

{verify_url}

This link will expire in 24 hours.

If you didn't create a UniThrift account, you can safely ignore this email."#,
        name = name,
        verify_url = verify_url,
    );

    (html, text)
}

pub fn render_password_reset_email(name: &str, reset_url: &str) -> (String, String) {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<body style="margin:0;padding:0;background-color:#f5f5f5;font-family:-apple-system,'Segoe UI',Roboto,Arial,sans-serif;">
    <div style="max-width:560px;margin:0 auto;padding:40px 20px;">
        <div style="background:#ffffff;border-radius:8px;overflow:hidden;box-shadow:0 2px 8px rgba(0,0,0,0.06);">
            <div style="background:#16a34a;color:#ffffff;padding:28px 24px;text-align:center;">
                <h1 style="margin:0;font-size:22px;">Password Reset</h1>
            </div>
            <div style="padding:32px 24px;color:#374151;line-height:1.6;">
                <p>Hi {name},</p>
                <p>We received a request to reset your UniThrift password. Click the button below to choose a new one.</p>
                <div style="text-align:center;margin:32px 0;">
                    <a href="{reset_url}" style="display:inline-block;background:#16a34a;color:#ffffff !important;text-decoration:none;padding:14px 32px;border-radius:6px;font-weight:500;">Reset Password</a>
                </div>
                <p style="color:#6b7280;font-size:13px;">This link will expire in 30 minutes. If you didn't request a password reset, you can safely ignore this email and your password will stay unchanged.</p>
            </div>
        </div>
    </div>
</body>
</html>"#,
        name = html_escape(name),
        reset_url = reset_url,
    );

    let text = format!(
        r#"Password Reset

Hi {name},

We received a request to reset your UniThrift password. Choose a new one here:

{reset_url}

This link will expire in 30 minutes.

If you didn't request a password reset, you can safely ignore this email and your password will stay unchanged."#,
        name = name,
        reset_url = reset_url,
    );

    (html, text)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
