use std::sync::Arc;

use crates::domain::repositories::organisations::OrganisationRepository;
use tracing::{error, info};
use uuid::Uuid;

use crate::usecases::errors::{BusinessWallError, UseCaseResult};

/// Deletes auto organisations once their last member is gone.
///
/// It never changes membership itself; callers run it after every mutation
/// that can empty an organisation.
pub struct OrganisationGarbageCollector<O>
where
    O: OrganisationRepository + Send + Sync + ?Sized + 'static,
{
    organisation_repository: Arc<O>,
}

impl<O> OrganisationGarbageCollector<O>
where
    O: OrganisationRepository + Send + Sync + ?Sized + 'static,
{
    pub fn new(organisation_repository: Arc<O>) -> Self {
        Self {
            organisation_repository,
        }
    }

    /// Returns whether the organisation was deleted.
    pub async fn collect(&self, organisation_id: Uuid) -> UseCaseResult<bool> {
        let Some(organisation) = self
            .organisation_repository
            .find_by_id(organisation_id)
            .await
            .map_err(|err| db_error(organisation_id, err, "failed to load organisation"))?
        else {
            return Ok(false);
        };

        if !organisation.is_auto {
            return Ok(false);
        }

        let members = self
            .organisation_repository
            .count_members(organisation_id)
            .await
            .map_err(|err| db_error(organisation_id, err, "failed to count members"))?;
        if members > 0 {
            return Ok(false);
        }

        self.organisation_repository
            .delete(organisation_id)
            .await
            .map_err(|err| db_error(organisation_id, err, "failed to delete organisation"))?;

        info!(%organisation_id, "organisation_gc: empty auto organisation deleted");
        Ok(true)
    }

    /// Sweeps every empty auto organisation. Returns the number deleted.
    pub async fn collect_all_orphans(&self) -> UseCaseResult<usize> {
        let candidates = self
            .organisation_repository
            .list_orphan_auto_ids()
            .await
            .map_err(|err| {
                error!(db_error = ?err, "organisation_gc: failed to list orphan organisations");
                BusinessWallError::Internal(err)
            })?;

        let mut deleted = 0;
        for organisation_id in candidates {
            // Re-checked one by one: a member may have joined since the listing.
            if self.collect(organisation_id).await? {
                deleted += 1;
            }
        }

        info!(deleted, "organisation_gc: orphan sweep finished");
        Ok(deleted)
    }
}

fn db_error(organisation_id: Uuid, err: anyhow::Error, message: &'static str) -> BusinessWallError {
    error!(%organisation_id, db_error = ?err, "organisation_gc: {}", message);
    BusinessWallError::Internal(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::organisation;
    use crates::domain::repositories::organisations::MockOrganisationRepository;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn auto_organisation_losing_its_sole_member_is_deleted() {
        let org = organisation(true);
        let org_id = org.id;

        let mut repo = MockOrganisationRepository::new();
        repo.expect_find_by_id()
            .with(eq(org_id))
            .returning(move |_| Ok(Some(org.clone())));
        repo.expect_count_members().with(eq(org_id)).returning(|_| Ok(0));
        repo.expect_delete().with(eq(org_id)).times(1).returning(|_| Ok(()));

        let gc = OrganisationGarbageCollector::new(Arc::new(repo));

        assert!(gc.collect(org_id).await.expect("collect"));
    }

    #[tokio::test]
    async fn auto_organisation_with_remaining_member_is_kept() {
        let org = organisation(true);
        let org_id = org.id;

        let mut repo = MockOrganisationRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(org.clone())));
        repo.expect_count_members().returning(|_| Ok(1));
        repo.expect_delete().times(0);

        let gc = OrganisationGarbageCollector::new(Arc::new(repo));

        assert!(!gc.collect(org_id).await.expect("collect"));
    }

    #[tokio::test]
    async fn claimed_organisation_is_never_deleted() {
        let org = organisation(false);
        let org_id = org.id;

        let mut repo = MockOrganisationRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(org.clone())));
        repo.expect_count_members().times(0);
        repo.expect_delete().times(0);

        let gc = OrganisationGarbageCollector::new(Arc::new(repo));

        assert!(!gc.collect(org_id).await.expect("collect"));
    }

    #[tokio::test]
    async fn sweep_counts_only_organisations_still_empty() {
        let empty = organisation(true);
        let rejoined = organisation(true);
        let (empty_id, rejoined_id) = (empty.id, rejoined.id);

        let mut repo = MockOrganisationRepository::new();
        repo.expect_list_orphan_auto_ids()
            .returning(move || Ok(vec![empty_id, rejoined_id]));
        repo.expect_find_by_id().returning(move |id| {
            if id == empty_id {
                Ok(Some(empty.clone()))
            } else {
                Ok(Some(rejoined.clone()))
            }
        });
        repo.expect_count_members()
            .returning(move |id| Ok(if id == empty_id { 0 } else { 1 }));
        repo.expect_delete().with(eq(empty_id)).times(1).returning(|_| Ok(()));

        let gc = OrganisationGarbageCollector::new(Arc::new(repo));

        assert_eq!(gc.collect_all_orphans().await.expect("sweep"), 1);
    }
}
