// src/services/mailer.rs

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::models::auth::Role;

// ---
// Fila de e-mails de boas-vindas.
// O request só enfileira; a entrega (com retentativas) roda numa task separada
// e nunca afeta a resposta nem desfaz a conta criada.
// ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeEmail {
    pub to: String,
    pub display_name: String,
    pub role: Role,
}

impl WelcomeEmail {
    pub fn subject(&self) -> &'static str {
        "Franchise Management System Login"
    }

    // A senha nunca vai no corpo do e-mail
    pub fn body(&self) -> String {
        format!(
            "Hello {},\n\nAn account with the role '{}' was created for you.\nLogin email: {}\n\nUse the password provided by your administrator and change it after the first login.",
            self.display_name,
            role_label(self.role),
            self.to
        )
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::FranchiseHead => "franchise head",
        Role::Staff => "staff",
        Role::Student => "student",
    }
}

/// Canal de entrega (SMTP, API de terceiros, log...).
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, from: &str, mail: &WelcomeEmail) -> anyhow::Result<()>;
}

/// Transporte padrão: só registra a mensagem no log.
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, from: &str, mail: &WelcomeEmail) -> anyhow::Result<()> {
        tracing::info!(from, to = %mail.to, subject = mail.subject(), "📧 {}", mail.body());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    // Backoff exponencial: base, 2*base, 4*base...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

#[derive(Clone)]
pub struct Mailer {
    tx: mpsc::UnboundedSender<WelcomeEmail>,
}

impl Mailer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WelcomeEmail>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Nunca bloqueia nem falha para quem chama.
    pub fn enqueue(&self, mail: WelcomeEmail) {
        if let Err(e) = self.tx.send(mail) {
            tracing::warn!("Fila de e-mails fechada, mensagem para '{}' descartada.", e.0.to);
        }
    }
}

/// Consome a fila até todos os `Mailer` serem descartados.
pub async fn run_mail_worker(
    mut rx: mpsc::UnboundedReceiver<WelcomeEmail>,
    transport: Arc<dyn MailTransport>,
    from: String,
    policy: RetryPolicy,
) {
    while let Some(mail) = rx.recv().await {
        deliver(transport.as_ref(), &from, &mail, policy).await;
    }
    tracing::info!("Worker de e-mails encerrado.");
}

// Devolve `true` se alguma tentativa deu certo
async fn deliver(transport: &dyn MailTransport, from: &str, mail: &WelcomeEmail, policy: RetryPolicy) -> bool {
    for attempt in 1..=policy.max_attempts {
        match transport.send(from, mail).await {
            Ok(()) => return true,
            Err(e) if attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(attempt, ?delay, "Falha ao enviar e-mail para '{}': {:#}", mail.to, e);
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                tracing::warn!(attempt, "Desistindo do e-mail para '{}': {:#}", mail.to, e);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Falha nas primeiras `failures` chamadas e registra os destinatários entregues
    struct FlakyTransport {
        failures: Mutex<u32>,
        attempts: Mutex<u32>,
        delivered: Mutex<Vec<String>>,
    }

    impl FlakyTransport {
        fn new(failures: u32) -> Self {
            Self { failures: Mutex::new(failures), attempts: Mutex::new(0), delivered: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl MailTransport for FlakyTransport {
        async fn send(&self, _from: &str, mail: &WelcomeEmail) -> anyhow::Result<()> {
            *self.attempts.lock().unwrap() += 1;
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                anyhow::bail!("smtp unavailable");
            }
            self.delivered.lock().unwrap().push(mail.to.clone());
            Ok(())
        }
    }

    fn mail(to: &str) -> WelcomeEmail {
        WelcomeEmail { to: to.into(), display_name: "Asha".into(), role: Role::Staff }
    }

    const FAST: RetryPolicy = RetryPolicy { max_attempts: 3, base_delay: Duration::from_millis(1) };

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy { max_attempts: 5, base_delay: Duration::from_millis(500) };
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(2000));
    }

    #[test]
    fn body_names_the_recipient_and_login() {
        let body = mail("asha@example.com").body();
        assert!(body.contains("asha@example.com"));
        assert!(body.contains("Hello Asha"));
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let transport = FlakyTransport::new(2);
        assert!(deliver(&transport, "no-reply@test", &mail("a@x.com"), FAST).await);
        assert_eq!(*transport.attempts.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let transport = FlakyTransport::new(10);
        assert!(!deliver(&transport, "no-reply@test", &mail("a@x.com"), FAST).await);
        assert_eq!(*transport.attempts.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn worker_drains_the_queue_until_senders_drop() {
        let transport = Arc::new(FlakyTransport::new(1));
        let (mailer, rx) = Mailer::new();
        mailer.enqueue(mail("a@x.com"));
        mailer.enqueue(mail("b@x.com"));
        drop(mailer);

        run_mail_worker(rx, transport.clone(), "no-reply@test".into(), FAST).await;
        assert_eq!(*transport.delivered.lock().unwrap(), vec!["a@x.com".to_string(), "b@x.com".to_string()]);
    }

    #[test]
    fn enqueue_on_a_closed_queue_does_not_panic() {
        let (mailer, rx) = Mailer::new();
        drop(rx);
        mailer.enqueue(mail("a@x.com"));
    }
}
