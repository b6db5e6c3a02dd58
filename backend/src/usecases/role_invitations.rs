use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::domain::{
    entities::{
        business_walls::BusinessWallEntity,
        role_assignments::{InsertRoleAssignmentEntity, RoleAssignmentEntity},
        users::UserEntity,
    },
    repositories::{
        business_walls::BusinessWallRepository, organisations::OrganisationRepository,
        role_assignments::RoleAssignmentRepository, users::UserRepository,
    },
    value_objects::{
        business_walls::{InternalRolesView, PendingInvitationView},
        emails::parse_email_list,
        enums::{
            invitation_statuses::{InvitationAction, InvitationStatus, InvitationTransition},
            role_types::BwRoleType,
        },
        invitations::{InvitationBatchReport, InvitationOutcome},
        users::{CurrentUser, MemberView},
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::usecases::{
    business_walls::business_wall_name,
    errors::{BusinessWallError, UseCaseResult},
    membership::MembershipUseCase,
    notifications::{BwNotifier, InvitationEmail, NotificationGateway, ResponseEmail},
};

pub struct RoleInvitationUseCase<B, R, U, O, N>
where
    B: BusinessWallRepository + Send + Sync + ?Sized + 'static,
    R: RoleAssignmentRepository + Send + Sync + ?Sized + 'static,
    U: UserRepository + Send + Sync + ?Sized + 'static,
    O: OrganisationRepository + Send + Sync + ?Sized + 'static,
    N: NotificationGateway + ?Sized + 'static,
{
    business_wall_repository: Arc<B>,
    role_assignment_repository: Arc<R>,
    user_repository: Arc<U>,
    organisation_repository: Arc<O>,
    membership: Arc<MembershipUseCase<U, O>>,
    notifier: Arc<BwNotifier<N>>,
}

impl<B, R, U, O, N> RoleInvitationUseCase<B, R, U, O, N>
where
    B: BusinessWallRepository + Send + Sync + ?Sized + 'static,
    R: RoleAssignmentRepository + Send + Sync + ?Sized + 'static,
    U: UserRepository + Send + Sync + ?Sized + 'static,
    O: OrganisationRepository + Send + Sync + ?Sized + 'static,
    N: NotificationGateway + ?Sized + 'static,
{
    pub fn new(
        business_wall_repository: Arc<B>,
        role_assignment_repository: Arc<R>,
        user_repository: Arc<U>,
        organisation_repository: Arc<O>,
        membership: Arc<MembershipUseCase<U, O>>,
        notifier: Arc<BwNotifier<N>>,
    ) -> Self {
        Self {
            business_wall_repository,
            role_assignment_repository,
            user_repository,
            organisation_repository,
            membership,
            notifier,
        }
    }

    /// Invites every address of `raw_emails` to `role_type`.
    ///
    /// Add-only: existing rows are left as they are and get no new email.
    /// Known users must already belong to the wall's organisation; unknown
    /// addresses get a new user attached to it.
    pub async fn invite_internal_role(
        &self,
        business_wall: &BusinessWallEntity,
        raw_emails: &str,
        role_type: BwRoleType,
        inviter: &CurrentUser,
    ) -> UseCaseResult<InvitationBatchReport> {
        let business_wall_id = business_wall.id;
        if !role_type.is_invitable() {
            warn!(%business_wall_id, %role_type, "role_invitations: role cannot be invited");
            return Err(BusinessWallError::UnknownAction);
        }
        let Some(organisation_id) = business_wall.organisation_id else {
            return Err(BusinessWallError::NoOrganisation);
        };
        let bw_name =
            business_wall_name(self.organisation_repository.as_ref(), business_wall).await?;
        let inviter_name = match inviter.full_name() {
            name if name.is_empty() => inviter.email.clone(),
            name => name,
        };

        let mut report = InvitationBatchReport::default();
        for email in parse_email_list(raw_emails) {
            let user = match self.find_user_by_email(&email).await? {
                Some(user) if user.organisation_id == Some(organisation_id) => user,
                Some(user) => {
                    info!(
                        %business_wall_id,
                        user_id = %user.id,
                        "role_invitations: invitee outside organisation",
                    );
                    report.refused.push(email);
                    continue;
                }
                None => self.membership.create_member(&email, organisation_id).await?,
            };

            let inserted = self
                .role_assignment_repository
                .insert_if_absent(InsertRoleAssignmentEntity {
                    business_wall_id: Some(business_wall_id),
                    user_id: user.id,
                    role_type: role_type.to_string(),
                    invitation_status: InvitationStatus::Pending.to_string(),
                    invited_at: Utc::now(),
                    accepted_at: None,
                })
                .await
                .map_err(|err| {
                    error!(
                        %business_wall_id,
                        user_id = %user.id,
                        db_error = ?err,
                        "role_invitations: insert failed",
                    );
                    BusinessWallError::Internal(err)
                })?;

            let Some(role_assignment) = inserted else {
                report.already_invited.push(email);
                continue;
            };

            info!(
                %business_wall_id,
                user_id = %role_assignment.user_id,
                %role_type,
                "role_invitations: invitation created"
            );
            self.notifier
                .send_invitation(InvitationEmail {
                    recipient: &email,
                    business_wall_id,
                    bw_name: &bw_name,
                    role_type,
                    invited_user_id: role_assignment.user_id,
                    inviter_name: &inviter_name,
                })
                .await;
            report.invited.push(email);
        }

        Ok(report)
    }

    /// Shows (`action == None`) or answers a role invitation.
    ///
    /// Only the invited user may act. A second answer is a no-op that reports
    /// the stored status.
    pub async fn respond_to_invitation(
        &self,
        business_wall_id: Uuid,
        role_type: BwRoleType,
        responding_user_id: Uuid,
        requesting_user_id: Uuid,
        action: Option<InvitationAction>,
    ) -> UseCaseResult<InvitationOutcome> {
        if responding_user_id != requesting_user_id {
            warn!(
                %business_wall_id,
                %responding_user_id,
                %requesting_user_id,
                "role_invitations: invitation link used by another user"
            );
            return Err(BusinessWallError::WrongValidationLink);
        }

        let business_wall = self
            .business_wall_repository
            .find_by_id(business_wall_id)
            .await
            .map_err(|err| {
                error!(%business_wall_id, db_error = ?err, "role_invitations: lookup failed");
                BusinessWallError::Internal(err)
            })?
            .ok_or(BusinessWallError::BwNotFound)?;

        let role_assignment = self
            .find_assignment(business_wall_id, responding_user_id, role_type)
            .await?
            .ok_or(BusinessWallError::InvitationNotFound)?;

        let bw_name =
            business_wall_name(self.organisation_repository.as_ref(), &business_wall).await?;
        let outcome = |status: InvitationStatus, already_processed: bool| InvitationOutcome {
            business_wall_id,
            bw_name: bw_name.clone(),
            bw_type: business_wall.bw_type.clone(),
            role_type,
            role_label: role_type.label(),
            status,
            already_processed,
        };

        let current = role_assignment.status();
        let Some(action) = action else {
            return Ok(outcome(current, current != InvitationStatus::Pending));
        };

        let next = match current.apply(action) {
            InvitationTransition::AlreadyProcessed(status) => {
                info!(
                    %business_wall_id,
                    user_id = %responding_user_id,
                    %status,
                    "role_invitations: already processed",
                );
                return Ok(outcome(status, true));
            }
            InvitationTransition::Applied(next) => next,
        };

        let updated = self
            .role_assignment_repository
            .respond(role_assignment.id, next, Utc::now())
            .await
            .map_err(|err| {
                error!(%business_wall_id, db_error = ?err, "role_invitations: update failed");
                BusinessWallError::Internal(err)
            })?;

        if !updated {
            // A concurrent answer won; report what it stored.
            let stored = self
                .find_assignment(business_wall_id, responding_user_id, role_type)
                .await?
                .map(|row| row.status())
                .unwrap_or(current);
            return Ok(outcome(stored, true));
        }

        info!(
            %business_wall_id,
            user_id = %responding_user_id,
            %role_type,
            status = %next,
            "role_invitations: invitation answered",
        );
        self.notify_owner(&business_wall, &bw_name, role_type, responding_user_id, next)
            .await;

        Ok(outcome(next, false))
    }

    /// Moves pending invitations sent before `cutoff` to expired.
    pub async fn expire_stale_invitations(&self, cutoff: DateTime<Utc>) -> UseCaseResult<usize> {
        let expired = self
            .role_assignment_repository
            .expire_pending_before(cutoff)
            .await
            .map_err(|err| {
                error!(%cutoff, db_error = ?err, "role_invitations: expiry sweep failed");
                BusinessWallError::Internal(err)
            })?;

        info!(%cutoff, expired, "role_invitations: stale invitations expired");
        Ok(expired)
    }

    pub async fn internal_roles_view(
        &self,
        business_wall: &BusinessWallEntity,
    ) -> UseCaseResult<InternalRolesView> {
        let role_assignments = self
            .role_assignment_repository
            .list_by_business_wall(business_wall.id)
            .await
            .map_err(|err| {
                error!(
                    business_wall_id = %business_wall.id,
                    db_error = ?err,
                    "role_invitations: list failed",
                );
                BusinessWallError::Internal(err)
            })?;

        let mut user_ids: Vec<Uuid> = role_assignments.iter().map(|a| a.user_id).collect();
        user_ids.push(business_wall.owner_id);
        user_ids.sort();
        user_ids.dedup();

        let users = self
            .user_repository
            .list_by_ids(user_ids)
            .await
            .map_err(|err| {
                error!(
                    business_wall_id = %business_wall.id,
                    db_error = ?err,
                    "role_invitations: user lookup failed",
                );
                BusinessWallError::Internal(err)
            })?;

        let mut view = InternalRolesView {
            business_wall_id: business_wall.id,
            owner: users
                .iter()
                .find(|user| user.id == business_wall.owner_id)
                .map(MemberView::from),
            bwmi_members: Vec::new(),
            bwpri_members: Vec::new(),
            bwmi_pending: Vec::new(),
            bwpri_pending: Vec::new(),
        };

        for assignment in &role_assignments {
            let Some(user) = users.iter().find(|user| user.id == assignment.user_id) else {
                continue;
            };
            let status = assignment.status();
            let (members, pending) = match assignment.role() {
                Some(BwRoleType::Bwmi) => (&mut view.bwmi_members, &mut view.bwmi_pending),
                Some(BwRoleType::Bwpri) => (&mut view.bwpri_members, &mut view.bwpri_pending),
                Some(BwRoleType::BwOwner) | None => continue,
            };
            if status == InvitationStatus::Accepted {
                members.push(MemberView::from(user));
            } else {
                pending.push(PendingInvitationView {
                    email: user.email.clone(),
                    status,
                });
            }
        }

        Ok(view)
    }

    async fn find_assignment(
        &self,
        business_wall_id: Uuid,
        user_id: Uuid,
        role_type: BwRoleType,
    ) -> UseCaseResult<Option<RoleAssignmentEntity>> {
        self.role_assignment_repository
            .find(business_wall_id, user_id, role_type)
            .await
            .map_err(|err| {
                error!(
                    %business_wall_id,
                    %user_id,
                    db_error = ?err,
                    "role_invitations: lookup failed",
                );
                BusinessWallError::Internal(err)
            })
    }

    async fn find_user_by_email(&self, email: &str) -> UseCaseResult<Option<UserEntity>> {
        self.user_repository.find_by_email(email).await.map_err(|err| {
            error!(db_error = ?err, "role_invitations: user lookup failed");
            BusinessWallError::Internal(err)
        })
    }

    async fn notify_owner(
        &self,
        business_wall: &BusinessWallEntity,
        bw_name: &str,
        role_type: BwRoleType,
        responder_id: Uuid,
        status: InvitationStatus,
    ) {
        let users = match self
            .user_repository
            .list_by_ids(vec![business_wall.owner_id, responder_id])
            .await
        {
            Ok(users) => users,
            Err(err) => {
                error!(
                    business_wall_id = %business_wall.id,
                    db_error = ?err,
                    "role_invitations: owner lookup failed",
                );
                return;
            }
        };

        let Some(owner) = users.iter().find(|user| user.id == business_wall.owner_id) else {
            warn!(
                business_wall_id = %business_wall.id,
                "role_invitations: owner not found, no notification",
            );
            return;
        };
        let responder_name = users
            .iter()
            .find(|user| user.id == responder_id)
            .map(|user| MemberView::from(user).full_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Un membre de votre organisation".to_string());

        self.notifier
            .send_response(
                business_wall.id,
                ResponseEmail {
                    owner_email: &owner.email,
                    bw_name,
                    role_type,
                    responder_name: &responder_name,
                    status,
                },
            )
            .await;
    }
}
