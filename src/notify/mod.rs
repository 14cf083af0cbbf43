//! Task assignment notices sent by e-mail.
//!
//! Notices go out after the tasks are committed. A failed delivery is logged
//! and never changes the API response.

use lettre::message::{header::ContentType, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tokio::task::JoinHandle;

use crate::config::SmtpConfig;
use crate::errors::NotifyError;
use crate::models::{Member, Task};

/// One task assigned to one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentNotice {
    pub to_email: String,
    pub member_name: String,
    pub task_title: String,
    pub task_description: Option<String>,
}

impl AssignmentNotice {
    pub fn new(member: &Member, task: &Task) -> Self {
        Self {
            to_email: member.email.clone(),
            member_name: member.name.clone(),
            task_title: task.title.clone(),
            task_description: task.description.clone(),
        }
    }

    pub fn subject(&self) -> String {
        format!("New Task Assigned: {}", self.task_title)
    }

    pub fn body(&self) -> String {
        format!(
            "Hi {},\n\n\
             You have been assigned a new task:\n\n\
             Task: {}\n\
             Description: {}\n\n\
             Please log in to the task management system \
             to view and update your task status.\n\n\
             Best regards,\n\
             Task Management Team\n",
            self.member_name,
            self.task_title,
            self.task_description.as_deref().unwrap_or("-"),
        )
    }

    /// Build the message sent from `from`.
    pub fn compose(&self, from: &str) -> Result<Message, NotifyError> {
        let from: Mailbox = from.parse()?;
        let to = Mailbox::new(
            Some(self.member_name.clone()),
            self.to_email.trim().parse::<Address>()?,
        );

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body())?;
        Ok(message)
    }
}

/// Notices for the assigned tasks whose assignee is in `members`.
pub fn notices_for(members: &[Member], tasks: &[Task]) -> Vec<AssignmentNotice> {
    tasks
        .iter()
        .filter_map(|task| {
            let member = members.iter().find(|m| Some(m.id) == task.assigned_to_id)?;
            Some(AssignmentNotice::new(member, task))
        })
        .collect()
}

/// Result of a single notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No SMTP credentials are configured
    Skipped,
}

/// Sends assignment notices through an SMTP relay.
#[derive(Clone)]
pub struct Notifier {
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_email: String,
}

impl Notifier {
    /// Build a notifier from SMTP settings.
    ///
    /// Without credentials the notifier is disabled and every notice is skipped.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        if !config.has_credentials() {
            tracing::info!("SMTP credentials not configured; assignment e-mails are disabled");
            return Ok(Self::disabled());
        }

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            mailer: Some(mailer),
            from_email: config.from_email.clone(),
        })
    }

    pub fn disabled() -> Self {
        Self {
            mailer: None,
            from_email: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    /// Send one notice.
    pub async fn send(&self, notice: &AssignmentNotice) -> Result<Delivery, NotifyError> {
        let Some(mailer) = &self.mailer else {
            tracing::info!(
                "SMTP credentials not configured. Skipping e-mail to {}",
                notice.to_email
            );
            return Ok(Delivery::Skipped);
        };

        let message = notice.compose(&self.from_email)?;
        mailer.send(message).await?;
        tracing::info!("Assignment e-mail sent to {}", notice.to_email);
        Ok(Delivery::Sent)
    }

    /// Send notices in the background, one message each, logging failures.
    pub fn dispatch(&self, notices: Vec<AssignmentNotice>) -> JoinHandle<()> {
        let notifier = self.clone();
        tokio::spawn(async move {
            for notice in notices {
                if let Err(e) = notifier.send(&notice).await {
                    tracing::error!("Failed to send e-mail to {}: {}", notice.to_email, e);
                }
            }
        })
    }
}
