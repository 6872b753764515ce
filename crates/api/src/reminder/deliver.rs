use matchminder_api_structs::dtos::DeliveryReportDTO;
use matchminder_domain::{
    EmailAddress, LocalNotification, Permission, Reminder, ReminderChannel, ID,
};
use matchminder_infra::{
    encode_raw_message, generate_auth_url, get_valid_access_token, AccessTokenError, Bridge,
    MatchminderContext, PermissionGate,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Notifications are not supported in this environment: {0}")]
    Unsupported(String),
    #[error("Notification permission has not been granted")]
    PermissionDenied,
    #[error("The mailbox connection is missing or can no longer be refreshed")]
    AuthenticationRequired { auth_url: Option<String> },
    #[error("Invalid reminder: {0}")]
    Validation(String),
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl DeliveryError {
    /// Flattens a delivery outcome into the uniform report the HTTP
    /// surface returns for every channel
    pub fn into_report(result: Result<(), Self>, success_message: &str) -> DeliveryReportDTO {
        match result {
            Ok(_) => DeliveryReportDTO {
                success: true,
                message: success_message.to_string(),
                auth_required: None,
                auth_url: None,
            },
            Err(DeliveryError::AuthenticationRequired { auth_url }) => DeliveryReportDTO {
                success: false,
                message: "Connect your mailbox to receive email reminders".to_string(),
                auth_required: Some(true),
                auth_url,
            },
            Err(e) => DeliveryReportDTO {
                success: false,
                message: e.to_string(),
                auth_required: None,
                auth_url: None,
            },
        }
    }
}

/// Routes a due reminder to exactly one delivery channel
pub async fn deliver(
    reminder: &Reminder,
    ctx: &MatchminderContext,
    gate: &PermissionGate,
    bridge: &Bridge,
) -> Result<(), DeliveryError> {
    match reminder.channel {
        ReminderChannel::Notification => deliver_notification(reminder, gate, bridge),
        // Calendar reminders are satisfied by the ICS download at
        // creation time, there is nothing to push
        ReminderChannel::Calendar => Ok(()),
        ReminderChannel::Email => {
            let to = reminder
                .email
                .as_ref()
                .ok_or_else(|| {
                    DeliveryError::Validation(
                        "Email reminder is missing a destination address".to_string(),
                    )
                })?;
            let body = format!("<h2>{}</h2><p>{}</p>", reminder.title, reminder.message);
            send_reminder_email(to, &reminder.title, &body, reminder.user_id.as_ref(), ctx).await
        }
    }
}

pub fn deliver_notification(
    reminder: &Reminder,
    gate: &PermissionGate,
    bridge: &Bridge,
) -> Result<(), DeliveryError> {
    let support = gate.check_support();
    if !support.supported {
        return Err(DeliveryError::Unsupported(
            support
                .reason
                .unwrap_or_else(|| "Unknown reason".to_string()),
        ));
    }
    if gate.get_permission() != Permission::Granted {
        return Err(DeliveryError::PermissionDenied);
    }

    let notification = LocalNotification {
        title: reminder.title.clone(),
        body: reminder.message.clone(),
        icon: "/icons/match-reminder.png".to_string(),
        match_id: LocalNotification::match_id_from_reminder_id(&reminder.id),
    };
    if !bridge.show_notification(notification) {
        return Err(DeliveryError::Delivery(
            "No page context is attached to show the notification".to_string(),
        ));
    }
    Ok(())
}

/// Sends one reminder email. A reminder owned by a user goes out
/// through their connected mailbox; without an owner it falls back to
/// the deployment-wide transactional sender. An unusable mailbox
/// connection surfaces `AuthenticationRequired` with a consent URL
/// instead of silently switching senders.
pub async fn send_reminder_email(
    to: &EmailAddress,
    subject: &str,
    html_body: &str,
    user_id: Option<&ID>,
    ctx: &MatchminderContext,
) -> Result<(), DeliveryError> {
    match user_id {
        Some(user_id) => {
            let access_token =
                get_valid_access_token(user_id, ctx)
                    .await
                    .map_err(|e| match e {
                        AccessTokenError::AuthenticationRequired => {
                            DeliveryError::AuthenticationRequired {
                                auth_url: ctx
                                    .config
                                    .google
                                    .as_ref()
                                    .map(|settings| generate_auth_url(settings, Some(user_id))),
                            }
                        }
                        AccessTokenError::StorageError => {
                            DeliveryError::Delivery("Unable to read the mailbox connection".to_string())
                        }
                    })?;

            let raw_message = encode_raw_message("me", to.as_str(), subject, html_body);
            ctx.services
                .mail_api
                .send_raw(&access_token, &raw_message)
                .await
                .map_err(|e| DeliveryError::Delivery(e.to_string()))
        }
        None => {
            let text_body = format!("{}\r\n\r\n{}", subject, html_body);
            ctx.services
                .mailer
                .send(to, subject, html_body, &text_body)
                .await
                .map_err(|e| DeliveryError::Delivery(e.to_string()))
        }
    }
}
