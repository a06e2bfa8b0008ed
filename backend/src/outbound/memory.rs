//! In-memory implementation of every repository port.
//!
//! Used when no database URL is configured and as the backing store for HTTP
//! and behaviour tests. Matching rules follow the relational adapter: emails
//! compare case-insensitively, passwords exactly, and audit rows are grouped
//! by the business line's audit table.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AuditRepository, AuditRepositoryError, ChecklistRepository, ChecklistRepositoryError,
    LocationRepository, LocationRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    BusinessLine, ChecklistItem, EmailAddress, LocationAssignment, LocationId, LoginCredentials,
    NewAuditRecord, User,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<StoredUser>,
    assignments: Vec<(String, LocationAssignment)>,
    checklist: Vec<ChecklistItem>,
    /// Keyed by audit table name.
    audits: HashMap<String, Vec<NewAuditRecord>>,
}

/// Thread-safe in-memory store.
///
/// # Examples
/// ```
/// use audit_backend::outbound::memory::InMemoryAuditStore;
/// use audit_backend::domain::User;
///
/// let store = InMemoryAuditStore::default();
/// store.add_user(User::new("a@x.com", "Ada", "Lovelace"), "secret");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    tables: RwLock<Tables>,
    /// Reject a second record for the same item and location, mirroring a
    /// unique index on the audit table.
    enforce_unique_audits: bool,
}

impl InMemoryAuditStore {
    /// Store that rejects duplicate `(unique_id, location_id)` rows.
    pub fn with_unique_audits() -> Self {
        Self {
            tables: RwLock::default(),
            enforce_unique_audits: true,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        match self.tables.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        match self.tables.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register a user who can sign in with `password`.
    pub fn add_user(&self, user: User, password: &str) {
        self.write().users.push(StoredUser {
            user,
            password: password.to_owned(),
        });
    }

    /// Make a location visible to `user_mail`.
    pub fn assign_location(&self, user_mail: &str, assignment: LocationAssignment) {
        self.write()
            .assignments
            .push((user_mail.to_owned(), assignment));
    }

    pub fn add_checklist_item(&self, item: ChecklistItem) {
        self.write().checklist.push(item);
    }

    /// Every audit row recorded for the business line.
    pub fn audit_rows(&self, business_line: &BusinessLine) -> Vec<NewAuditRecord> {
        self.read()
            .audits
            .get(&business_line.audit_table())
            .cloned()
            .unwrap_or_default()
    }

    fn rows_for_location<'a>(
        tables: &'a Tables,
        business_line: &BusinessLine,
        location_id: &'a LocationId,
    ) -> impl Iterator<Item = &'a NewAuditRecord> + 'a {
        tables
            .audits
            .get(&business_line.audit_table())
            .into_iter()
            .flatten()
            .filter(move |row| &row.location_id == location_id)
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[async_trait]
impl UserRepository for InMemoryAuditStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .read()
            .users
            .iter()
            .find(|stored| email.matches(stored.user.email()))
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .read()
            .users
            .iter()
            .find(|stored| {
                credentials.email().matches(stored.user.email())
                    && stored.password == credentials.password()
            })
            .map(|stored| stored.user.clone()))
    }
}

#[async_trait]
impl LocationRepository for InMemoryAuditStore {
    async fn list_for_user(
        &self,
        user_mail: &str,
    ) -> Result<Vec<LocationAssignment>, LocationRepositoryError> {
        Ok(self
            .read()
            .assignments
            .iter()
            .filter(|(owner, _)| owner == user_mail)
            .map(|(_, assignment)| assignment.clone())
            .collect())
    }

    async fn find_for_user(
        &self,
        user_mail: &str,
        location_id: &LocationId,
    ) -> Result<Option<LocationAssignment>, LocationRepositoryError> {
        Ok(self
            .read()
            .assignments
            .iter()
            .find(|(owner, assignment)| owner == user_mail && &assignment.location_id == location_id)
            .map(|(_, assignment)| assignment.clone()))
    }
}

#[async_trait]
impl ChecklistRepository for InMemoryAuditStore {
    async fn count_for_business_line(
        &self,
        business_line: &BusinessLine,
    ) -> Result<u64, ChecklistRepositoryError> {
        let tables = self.read();
        Ok(count(
            tables
                .checklist
                .iter()
                .filter(|item| &item.business_line == business_line)
                .count(),
        ))
    }

    async fn list_for_business_line(
        &self,
        business_line: &BusinessLine,
    ) -> Result<Vec<ChecklistItem>, ChecklistRepositoryError> {
        Ok(self
            .read()
            .checklist
            .iter()
            .filter(|item| &item.business_line == business_line)
            .cloned()
            .collect())
    }

    async fn list_for_owner(
        &self,
        business_line: &BusinessLine,
        owner: &str,
    ) -> Result<Vec<ChecklistItem>, ChecklistRepositoryError> {
        Ok(self
            .read()
            .checklist
            .iter()
            .filter(|item| &item.business_line == business_line && item.owner == owner)
            .cloned()
            .collect())
    }

    async fn find_item(
        &self,
        business_line: &BusinessLine,
        owner: &str,
        unique_id: &str,
    ) -> Result<Option<ChecklistItem>, ChecklistRepositoryError> {
        Ok(self
            .read()
            .checklist
            .iter()
            .find(|item| {
                &item.business_line == business_line
                    && item.owner == owner
                    && item.unique_id == unique_id
            })
            .cloned())
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditStore {
    async fn count_for_location(
        &self,
        business_line: &BusinessLine,
        location_id: &LocationId,
    ) -> Result<u64, AuditRepositoryError> {
        let tables = self.read();
        Ok(count(
            Self::rows_for_location(&tables, business_line, location_id).count(),
        ))
    }

    async fn completed_ids(
        &self,
        business_line: &BusinessLine,
        location_id: &LocationId,
    ) -> Result<HashSet<String>, AuditRepositoryError> {
        let tables = self.read();
        Ok(Self::rows_for_location(&tables, business_line, location_id)
            .map(|row| row.unique_id.clone())
            .collect())
    }

    async fn count_for_item(
        &self,
        business_line: &BusinessLine,
        location_id: &LocationId,
        unique_id: &str,
    ) -> Result<u64, AuditRepositoryError> {
        let tables = self.read();
        Ok(count(
            Self::rows_for_location(&tables, business_line, location_id)
                .filter(|row| row.unique_id == unique_id)
                .count(),
        ))
    }

    async fn insert(&self, record: &NewAuditRecord) -> Result<(), AuditRepositoryError> {
        let mut tables = self.write();
        let rows = tables
            .audits
            .entry(record.business_line.audit_table())
            .or_default();
        if self.enforce_unique_audits
            && rows.iter().any(|row| {
                row.unique_id == record.unique_id && row.location_id == record.location_id
            })
        {
            return Err(AuditRepositoryError::duplicate(record.unique_id.as_str()));
        }
        rows.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuditSubmission, PointId, Score};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn t1() -> BusinessLine {
        BusinessLine::new("T1").expect("valid line")
    }

    fn l1() -> LocationAssignment {
        LocationAssignment {
            location_id: LocationId::new("L1").expect("valid id"),
            location_name: "Main St".into(),
            business_line: t1(),
            assigned_month: "Mar-2025".into(),
        }
    }

    fn item(unique_id: &str) -> ChecklistItem {
        ChecklistItem {
            unique_id: unique_id.into(),
            description: format!("Question {unique_id}"),
            impact: "Low".into(),
            weightage: None,
            owner: "Ops".into(),
            department: "Operations".into(),
            business_line: t1(),
        }
    }

    fn record(unique_id: &str) -> NewAuditRecord {
        let submission =
            AuditSubmission::try_new(unique_id, "Ops", Score::Five, "").expect("valid");
        NewAuditRecord::assemble(
            PointId::generate(Utc::now(), &mut rand::thread_rng()),
            &l1(),
            &item(unique_id),
            &submission,
            0,
            "a@x.com",
        )
    }

    #[fixture]
    fn store() -> InMemoryAuditStore {
        let store = InMemoryAuditStore::with_unique_audits();
        store.add_user(User::new("Auditor@X.com", "Ada", "L"), "secret");
        store.assign_location("Auditor@X.com", l1());
        store.add_checklist_item(item("1"));
        store.add_checklist_item(item("2"));
        store
    }

    #[rstest]
    #[case("auditor@x.com", "secret", true)]
    #[case("AUDITOR@x.com", "secret", true)]
    #[case("auditor@x.com", "Secret", false)]
    #[tokio::test]
    async fn credentials_match_email_case_insensitively(
        store: InMemoryAuditStore,
        #[case] email: &str,
        #[case] password: &str,
        #[case] found: bool,
    ) {
        let creds = LoginCredentials::try_from_parts(email, password).expect("valid creds");
        let user = store
            .find_by_credentials(&creds)
            .await
            .expect("lookup succeeds");
        assert_eq!(user.is_some(), found);
    }

    #[rstest]
    #[tokio::test]
    async fn audits_are_scoped_to_location(store: InMemoryAuditStore) {
        store.insert(&record("1")).await.expect("insert succeeds");
        let location = LocationId::new("L1").expect("valid id");
        let other = LocationId::new("L2").expect("valid id");

        assert_eq!(store.count_for_location(&t1(), &location).await.ok(), Some(1));
        assert_eq!(store.count_for_location(&t1(), &other).await.ok(), Some(0));
        assert_eq!(store.audit_rows(&t1()).len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn unique_store_rejects_second_record(store: InMemoryAuditStore) {
        store.insert(&record("1")).await.expect("first insert");
        let err = store
            .insert(&record("1"))
            .await
            .expect_err("duplicate rejected");
        assert_eq!(err, AuditRepositoryError::duplicate("1"));
    }

    #[rstest]
    #[tokio::test]
    async fn owner_lookup_requires_matching_owner(store: InMemoryAuditStore) {
        let found = store.find_item(&t1(), "Finance", "1").await.expect("lookup");
        assert!(found.is_none());
        let found = store.find_item(&t1(), "Ops", "1").await.expect("lookup");
        assert!(found.is_some());
    }
}
