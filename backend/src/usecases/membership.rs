use std::{collections::HashSet, sync::Arc};

use crates::domain::{
    entities::users::{InsertUserEntity, UserEntity},
    repositories::{organisations::OrganisationRepository, users::UserRepository},
    value_objects::{emails::parse_email_list, users::MemberView},
};
use tracing::{error, info};
use uuid::Uuid;

use crate::usecases::{
    errors::{BusinessWallError, UseCaseResult},
    organisation_gc::OrganisationGarbageCollector,
};

/// Every change of organisation membership goes through here so the
/// garbage collector runs on each organisation that lost a member.
pub struct MembershipUseCase<U, O>
where
    U: UserRepository + Send + Sync + ?Sized + 'static,
    O: OrganisationRepository + Send + Sync + ?Sized + 'static,
{
    user_repository: Arc<U>,
    garbage_collector: Arc<OrganisationGarbageCollector<O>>,
}

impl<U, O> MembershipUseCase<U, O>
where
    U: UserRepository + Send + Sync + ?Sized + 'static,
    O: OrganisationRepository + Send + Sync + ?Sized + 'static,
{
    pub fn new(
        user_repository: Arc<U>,
        garbage_collector: Arc<OrganisationGarbageCollector<O>>,
    ) -> Self {
        Self {
            user_repository,
            garbage_collector,
        }
    }

    pub async fn list_members(&self, organisation_id: Uuid) -> UseCaseResult<Vec<MemberView>> {
        let members = self.load_members(organisation_id).await?;
        Ok(members.iter().map(MemberView::from).collect())
    }

    /// Creates a user already attached to `organisation_id`.
    pub async fn create_member(
        &self,
        email: &str,
        organisation_id: Uuid,
    ) -> UseCaseResult<UserEntity> {
        let user = self
            .user_repository
            .create(InsertUserEntity {
                email: email.to_lowercase(),
                first_name: String::new(),
                last_name: String::new(),
                organisation_id: Some(organisation_id),
            })
            .await
            .map_err(|err| {
                error!(%organisation_id, db_error = ?err, "membership: failed to create user");
                BusinessWallError::Internal(err)
            })?;

        info!(user_id = %user.id, %organisation_id, "membership: user created in organisation");
        Ok(user)
    }

    /// Detaches a user from their organisation, then collects it.
    async fn remove_member(&self, user: &UserEntity) -> UseCaseResult<bool> {
        let Some(organisation_id) = user.organisation_id else {
            return Ok(false);
        };

        self.set_organisation(user.id, None).await?;
        self.garbage_collector.collect(organisation_id).await?;
        Ok(true)
    }

    /// Removes members whose email is absent from `raw_emails`.
    ///
    /// Remove-only: unknown emails in the list are ignored. Users in
    /// `protected` are never removed. Returns the removed emails.
    pub async fn change_members_emails(
        &self,
        organisation_id: Uuid,
        raw_emails: &str,
        protected: &HashSet<Uuid>,
    ) -> UseCaseResult<Vec<String>> {
        let keep: HashSet<String> = parse_email_list(raw_emails).into_iter().collect();
        let members = self.load_members(organisation_id).await?;

        let mut removed = Vec::new();
        for member in members {
            if protected.contains(&member.id) || keep.contains(&member.email.to_lowercase()) {
                continue;
            }
            if self.remove_member(&member).await? {
                removed.push(member.email);
            }
        }

        if !removed.is_empty() {
            info!(%organisation_id, removed = removed.len(), "membership: members removed");
        }

        Ok(removed)
    }

    async fn load_members(&self, organisation_id: Uuid) -> UseCaseResult<Vec<UserEntity>> {
        self.user_repository
            .list_members(organisation_id)
            .await
            .map_err(|err| {
                error!(%organisation_id, db_error = ?err, "membership: failed to list members");
                BusinessWallError::Internal(err)
            })
    }

    async fn set_organisation(
        &self,
        user_id: Uuid,
        organisation_id: Option<Uuid>,
    ) -> UseCaseResult<()> {
        self.user_repository
            .set_organisation(user_id, organisation_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "membership: failed to update organisation");
                BusinessWallError::Internal(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::{organisation, user};
    use crates::domain::repositories::{
        organisations::MockOrganisationRepository, users::MockUserRepository,
    };
    use mockall::predicate::{always, eq};
    use std::sync::atomic::{AtomicI64, Ordering};

    fn gc_expecting_member_count(
        org_id: Uuid,
        is_auto: bool,
        remaining: i64,
        deletes: usize,
    ) -> MockOrganisationRepository {
        let mut org = organisation(is_auto);
        org.id = org_id;

        let mut repo = MockOrganisationRepository::new();
        repo.expect_find_by_id()
            .with(eq(org_id))
            .returning(move |_| Ok(Some(org.clone())));
        repo.expect_count_members().returning(move |_| Ok(remaining));
        repo.expect_delete().times(deletes).returning(|_| Ok(()));
        repo
    }

    #[tokio::test]
    async fn removing_the_sole_member_deletes_the_auto_organisation() {
        let org_id = Uuid::new_v4();
        let member = user("a@x.com", Some(org_id));
        let member_id = member.id;

        let mut users = MockUserRepository::new();
        users
            .expect_set_organisation()
            .with(eq(member_id), eq(None))
            .times(1)
            .returning(|_, _| Ok(()));

        let organisations = gc_expecting_member_count(org_id, true, 0, 1);
        let gc = OrganisationGarbageCollector::new(Arc::new(organisations));
        let usecase = MembershipUseCase::new(Arc::new(users), Arc::new(gc));

        assert!(usecase.remove_member(&member).await.expect("remove"));
    }

    #[tokio::test]
    async fn removing_one_of_two_members_keeps_the_organisation() {
        let org_id = Uuid::new_v4();
        let member = user("a@x.com", Some(org_id));

        let mut users = MockUserRepository::new();
        users.expect_set_organisation().returning(|_, _| Ok(()));

        let organisations = gc_expecting_member_count(org_id, true, 1, 0);
        let gc = OrganisationGarbageCollector::new(Arc::new(organisations));
        let usecase = MembershipUseCase::new(Arc::new(users), Arc::new(gc));

        assert!(usecase.remove_member(&member).await.expect("remove"));
    }

    #[tokio::test]
    async fn email_list_change_removes_absent_members_but_not_protected_ones() {
        let org_id = Uuid::new_v4();
        let manager = user("boss@x.com", Some(org_id));
        let kept = user("kept@x.com", Some(org_id));
        let dropped = user("dropped@x.com", Some(org_id));
        let (manager_id, dropped_id) = (manager.id, dropped.id);
        let members = vec![manager, kept, dropped];

        let mut users = MockUserRepository::new();
        users
            .expect_list_members()
            .with(eq(org_id))
            .returning(move |_| Ok(members.clone()));
        users
            .expect_set_organisation()
            .with(eq(dropped_id), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let organisations = gc_expecting_member_count(org_id, false, 2, 0);
        let gc = OrganisationGarbageCollector::new(Arc::new(organisations));
        let usecase = MembershipUseCase::new(Arc::new(users), Arc::new(gc));

        let removed = usecase
            .change_members_emails(
                org_id,
                "KEPT@x.com\nstranger@x.com",
                &HashSet::from([manager_id]),
            )
            .await
            .expect("change");

        assert_eq!(removed, vec!["dropped@x.com".to_string()]);
    }

    #[tokio::test]
    async fn collector_runs_after_each_removal() {
        let org_id = Uuid::new_v4();
        let members = vec![user("a@x.com", Some(org_id)), user("b@x.com", Some(org_id))];

        let mut users = MockUserRepository::new();
        users
            .expect_list_members()
            .returning(move |_| Ok(members.clone()));
        users
            .expect_set_organisation()
            .with(always(), eq(None))
            .times(2)
            .returning(|_, _| Ok(()));

        let mut org = organisation(true);
        org.id = org_id;
        let remaining = AtomicI64::new(2);
        let mut organisations = MockOrganisationRepository::new();
        organisations
            .expect_find_by_id()
            .returning(move |_| Ok(Some(org.clone())));
        organisations
            .expect_count_members()
            .times(2)
            .returning(move |_| Ok(remaining.fetch_sub(1, Ordering::SeqCst) - 1));
        organisations.expect_delete().times(1).returning(|_| Ok(()));

        let gc = OrganisationGarbageCollector::new(Arc::new(organisations));
        let usecase = MembershipUseCase::new(Arc::new(users), Arc::new(gc));

        let removed = usecase
            .change_members_emails(org_id, "", &HashSet::new())
            .await
            .expect("change");

        assert_eq!(removed.len(), 2);
    }
}
