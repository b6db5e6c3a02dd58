use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use crates::{
    domain::value_objects::enums::{invitation_statuses::InvitationStatus, role_types::BwRoleType},
    infra::mailer::MailClient,
};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send(&self, message: EmailMessage) -> AnyResult<()>;
}

#[async_trait]
impl NotificationGateway for MailClient {
    async fn send(&self, message: EmailMessage) -> AnyResult<()> {
        MailClient::send(self, &message.to, &message.subject, &message.body).await
    }
}

/// Used when no mail API is configured.
pub struct LogOnlyMailer;

#[async_trait]
impl NotificationGateway for LogOnlyMailer {
    async fn send(&self, message: EmailMessage) -> AnyResult<()> {
        info!(subject = %message.subject, "notifications: mail api disabled, message not sent");
        Ok(())
    }
}

/// Gateway chosen at startup from the mail settings.
pub enum MailGateway {
    Api(MailClient),
    LogOnly(LogOnlyMailer),
}

#[async_trait]
impl NotificationGateway for MailGateway {
    async fn send(&self, message: EmailMessage) -> AnyResult<()> {
        match self {
            MailGateway::Api(client) => NotificationGateway::send(client, message).await,
            MailGateway::LogOnly(mailer) => mailer.send(message).await,
        }
    }
}

pub struct InvitationEmail<'a> {
    pub recipient: &'a str,
    pub business_wall_id: Uuid,
    pub bw_name: &'a str,
    pub role_type: BwRoleType,
    pub invited_user_id: Uuid,
    pub inviter_name: &'a str,
}

pub struct ResponseEmail<'a> {
    pub owner_email: &'a str,
    pub bw_name: &'a str,
    pub role_type: BwRoleType,
    pub responder_name: &'a str,
    pub status: InvitationStatus,
}

/// Renders and sends business wall emails. Delivery failures are logged and
/// swallowed so they never undo the state change that triggered them.
pub struct BwNotifier<N>
where
    N: NotificationGateway + ?Sized + 'static,
{
    gateway: Arc<N>,
    public_base_url: String,
}

impl<N> BwNotifier<N>
where
    N: NotificationGateway + ?Sized + 'static,
{
    pub fn new(gateway: Arc<N>, public_base_url: String) -> Self {
        Self {
            gateway,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn confirmation_link(
        &self,
        business_wall_id: Uuid,
        role_type: BwRoleType,
        user_id: Uuid,
    ) -> String {
        format!(
            "{}/BW/confirm-role-invitation/{}/{}/{}",
            self.public_base_url, business_wall_id, role_type, user_id
        )
    }

    pub async fn send_invitation(&self, invitation: InvitationEmail<'_>) -> bool {
        let link = self.confirmation_link(
            invitation.business_wall_id,
            invitation.role_type,
            invitation.invited_user_id,
        );
        let message = render_invitation(&invitation, &link);

        self.deliver(message, invitation.business_wall_id, "invitation").await
    }

    pub async fn send_response(&self, business_wall_id: Uuid, response: ResponseEmail<'_>) -> bool {
        let Some(message) = render_response(&response) else {
            return false;
        };

        self.deliver(message, business_wall_id, "invitation_response").await
    }

    async fn deliver(
        &self,
        message: EmailMessage,
        business_wall_id: Uuid,
        kind: &'static str,
    ) -> bool {
        match self.gateway.send(message).await {
            Ok(()) => {
                info!(%business_wall_id, kind, "notifications: email sent");
                true
            }
            Err(err) => {
                error!(
                    %business_wall_id,
                    kind,
                    error = ?err,
                    "notifications: email delivery failed",
                );
                false
            }
        }
    }
}

fn render_invitation(invitation: &InvitationEmail<'_>, link: &str) -> EmailMessage {
    let role_label = invitation.role_type.label();

    EmailMessage {
        to: invitation.recipient.to_string(),
        subject: format!(
            "Invitation : {} du Business Wall {}",
            role_label, invitation.bw_name
        ),
        body: format!(
            "Bonjour,\n\n\
             {} vous invite à devenir {} du Business Wall « {} ».\n\n\
             Pour accepter ou refuser cette invitation, rendez-vous sur :\n{}\n\n\
             Cordialement,\nL'équipe Business Wall",
            invitation.inviter_name, role_label, invitation.bw_name, link
        ),
    }
}

fn render_response(response: &ResponseEmail<'_>) -> Option<EmailMessage> {
    let verb = match response.status {
        InvitationStatus::Accepted => "accepté",
        InvitationStatus::Rejected => "refusé",
        InvitationStatus::Pending | InvitationStatus::Expired => return None,
    };
    let role_label = response.role_type.label();

    Some(EmailMessage {
        to: response.owner_email.to_string(),
        subject: format!(
            "{} a {} le rôle de {}",
            response.responder_name, verb, role_label
        ),
        body: format!(
            "Bonjour,\n\n\
             {} a {} votre invitation à devenir {} du Business Wall « {} ».\n\n\
             Cordialement,\nL'équipe Business Wall",
            response.responder_name, verb, role_label, response.bw_name
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invitation_contains_role_label_and_link() {
        let business_wall_id = Uuid::new_v4();
        let invited_user_id = Uuid::new_v4();
        let notifier = BwNotifier::new(Arc::new(LogOnlyMailer), "https://bw.example/".to_string());
        let link = notifier.confirmation_link(business_wall_id, BwRoleType::Bwmi, invited_user_id);

        assert_eq!(
            link,
            format!(
                "https://bw.example/BW/confirm-role-invitation/{business_wall_id}/BWMi/{invited_user_id}"
            )
        );

        let message = render_invitation(
            &InvitationEmail {
                recipient: "e1@x.com",
                business_wall_id,
                bw_name: "Le Quotidien",
                role_type: BwRoleType::Bwmi,
                invited_user_id,
                inviter_name: "Ada Lovelace",
            },
            &link,
        );

        assert_eq!(message.to, "e1@x.com");
        assert!(message.subject.contains("Business Wall Manager interne"));
        assert!(message.body.contains("« Le Quotidien »"));
        assert!(message.body.contains(&link));
    }

    #[test]
    fn only_final_answers_produce_a_response_email() {
        let response = |status| ResponseEmail {
            owner_email: "owner@x.com",
            bw_name: "Le Quotidien",
            role_type: BwRoleType::Bwpri,
            responder_name: "Grace Hopper",
            status,
        };

        let accepted =
            render_response(&response(InvitationStatus::Accepted)).expect("accepted mail");
        assert!(accepted.subject.contains("accepté"));
        assert_eq!(accepted.to, "owner@x.com");

        let rejected =
            render_response(&response(InvitationStatus::Rejected)).expect("rejected mail");
        assert!(rejected.body.contains("refusé"));

        assert!(render_response(&response(InvitationStatus::Pending)).is_none());
        assert!(render_response(&response(InvitationStatus::Expired)).is_none());
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let mut gateway = MockNotificationGateway::new();
        gateway
            .expect_send()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("smtp down")));

        let notifier = BwNotifier::new(Arc::new(gateway), "https://bw.example".to_string());
        let sent = notifier
            .send_invitation(InvitationEmail {
                recipient: "e1@x.com",
                business_wall_id: Uuid::new_v4(),
                bw_name: "Le Quotidien",
                role_type: BwRoleType::Bwmi,
                invited_user_id: Uuid::new_v4(),
                inviter_name: "Ada Lovelace",
            })
            .await;

        assert!(!sent);
    }
}
