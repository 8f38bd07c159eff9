//! RecordStore - append, list, find and delete credential records.
//!
//! Every operation takes the session explicitly and fails with
//! [`VaultError::SessionNotReady`] before a successful initialize/unlock.
//! Passwords are sealed on the way in and opened on the way out; the
//! website and username fields are stored as-is.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::session::VaultSession;
use crate::error::{Result, VaultError};
use crate::storage::{
    read_collection, write_collection, CredentialRecord, LoadPolicy, StoredRecord, VaultConfig,
};

#[derive(Debug, Clone)]
pub struct RecordStore {
    collection_path: PathBuf,
    load_policy: LoadPolicy,
}

impl RecordStore {
    pub fn new(config: &VaultConfig) -> Self {
        Self {
            collection_path: config.collection_file_path.clone(),
            load_policy: config.load_policy,
        }
    }

    pub fn collection_path(&self) -> &Path {
        &self.collection_path
    }

    /// Encrypt the record's password and append it to the collection.
    pub fn save(&self, session: &VaultSession, record: &CredentialRecord) -> Result<()> {
        session.require_ready()?;
        record.validate()?;

        let token = session.seal(&record.password)?;

        let mut records = self.load()?;
        records.push(StoredRecord {
            website: record.website.clone(),
            username: record.username.clone(),
            password: token,
        });
        write_collection(&self.collection_path, &records)?;

        debug!("Saved record for {} ({} total)", record.website, records.len());
        Ok(())
    }

    /// All records in insertion order with plaintext passwords.
    ///
    /// Aborts on the first token that cannot be decrypted.
    pub fn list(&self, session: &VaultSession) -> Result<Vec<CredentialRecord>> {
        session.require_ready()?;

        self.load()?
            .iter()
            .enumerate()
            .map(|(index, stored)| open_record(session, index, stored))
            .collect()
    }

    /// The first record whose website matches, with a plaintext password.
    ///
    /// Only the matching record is decrypted.
    pub fn find(&self, session: &VaultSession, website: &str) -> Result<Option<CredentialRecord>> {
        session.require_ready()?;

        self.load()?
            .iter()
            .enumerate()
            .find(|(_, stored)| stored.website == website)
            .map(|(index, stored)| open_record(session, index, stored))
            .transpose()
    }

    /// Remove every record whose website matches and rewrite the collection.
    ///
    /// Returns the number of records removed. The collection is rewritten
    /// even when nothing matched.
    pub fn delete(&self, session: &VaultSession, website: &str) -> Result<usize> {
        session.require_ready()?;

        let mut records = self.load()?;
        let before = records.len();
        records.retain(|stored| stored.website != website);
        let removed = before - records.len();

        write_collection(&self.collection_path, &records)?;

        info!("Deleted {} record(s) for {}", removed, website);
        Ok(removed)
    }

    fn load(&self) -> Result<Vec<StoredRecord>> {
        read_collection(&self.collection_path, self.load_policy)
    }
}

fn open_record(
    session: &VaultSession,
    index: usize,
    stored: &StoredRecord,
) -> Result<CredentialRecord> {
    let password = session.open(&stored.password).map_err(|e| match e {
        VaultError::Decryption(reason) => VaultError::Decryption(format!(
            "record {} ({}): {}",
            index, stored.website, reason
        )),
        other => other,
    })?;

    Ok(CredentialRecord::new(
        stored.website.clone(),
        stored.username.clone(),
        password,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KdfConfig;

    struct Fixture {
        _dir: tempfile::TempDir,
        config: VaultConfig,
        session: VaultSession,
        store: RecordStore,
    }

    fn fixture(policy: LoadPolicy) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::in_dir(dir.path())
            .with_kdf(KdfConfig::Pbkdf2Sha256 { iterations: 1_000 })
            .with_load_policy(policy);
        let mut session = VaultSession::new(&config);
        session.initialize("correcthorsebattery").unwrap();
        let store = RecordStore::new(&config);
        Fixture {
            _dir: dir,
            config,
            session,
            store,
        }
    }

    fn record(website: &str, username: &str, password: &str) -> CredentialRecord {
        CredentialRecord::new(website, username, password)
    }

    fn websites(records: &[CredentialRecord]) -> Vec<&str> {
        records.iter().map(|r| r.website.as_str()).collect()
    }

    #[test]
    fn test_save_then_list_recovers_plaintext() {
        let f = fixture(LoadPolicy::Lenient);
        let r = record("example.com", "alice", "p@ss1234");

        f.store.save(&f.session, &r).unwrap();

        assert_eq!(f.store.list(&f.session).unwrap(), vec![r]);
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let f = fixture(LoadPolicy::Lenient);
        f.store
            .save(&f.session, &record("example.com", "alice", "p@ss1234"))
            .unwrap();

        let text = std::fs::read_to_string(&f.config.collection_file_path).unwrap();
        assert!(text.contains("example.com"));
        assert!(text.contains("alice"));
        assert!(!text.contains("p@ss1234"));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let f = fixture(LoadPolicy::Lenient);
        assert!(f.store.list(&f.session).unwrap().is_empty());

        for site in ["c.com", "a.com", "b.com", "a.com"] {
            f.store.save(&f.session, &record(site, "u", "pw")).unwrap();
        }

        let listed = f.store.list(&f.session).unwrap();
        assert_eq!(websites(&listed), vec!["c.com", "a.com", "b.com", "a.com"]);
    }

    #[test]
    fn test_save_rejects_empty_fields_without_writing() {
        let f = fixture(LoadPolicy::Lenient);
        f.store.save(&f.session, &record("a.com", "u", "pw")).unwrap();
        let before = std::fs::read(&f.config.collection_file_path).unwrap();

        for bad in [
            record("", "u", "pw"),
            record("b.com", "", "pw"),
            record("b.com", "u", ""),
        ] {
            assert!(matches!(
                f.store.save(&f.session, &bad),
                Err(VaultError::InvalidRecord(_))
            ));
        }

        assert_eq!(std::fs::read(&f.config.collection_file_path).unwrap(), before);
    }

    #[test]
    fn test_delete_removes_all_matching_only() {
        let f = fixture(LoadPolicy::Lenient);
        f.store.save(&f.session, &record("a.com", "one", "1")).unwrap();
        f.store.save(&f.session, &record("b.com", "two", "2")).unwrap();
        f.store.save(&f.session, &record("a.com", "three", "3")).unwrap();

        assert_eq!(f.store.delete(&f.session, "a.com").unwrap(), 2);

        let listed = f.store.list(&f.session).unwrap();
        assert_eq!(listed, vec![record("b.com", "two", "2")]);
    }

    #[test]
    fn test_delete_missing_website_leaves_content_unchanged() {
        let f = fixture(LoadPolicy::Lenient);
        f.store.save(&f.session, &record("a.com", "one", "1")).unwrap();
        f.store.save(&f.session, &record("b.com", "two", "2")).unwrap();
        let before = f.store.list(&f.session).unwrap();

        assert_eq!(f.store.delete(&f.session, "nope.com").unwrap(), 0);

        assert_eq!(f.store.list(&f.session).unwrap(), before);
    }

    #[test]
    fn test_delete_matches_exact_text() {
        let f = fixture(LoadPolicy::Lenient);
        f.store.save(&f.session, &record("Example.com", "u", "1")).unwrap();
        assert_eq!(f.store.delete(&f.session, "example.com").unwrap(), 0);
        assert_eq!(f.store.list(&f.session).unwrap().len(), 1);
    }

    #[test]
    fn test_find_returns_first_match() {
        let f = fixture(LoadPolicy::Lenient);
        f.store.save(&f.session, &record("a.com", "first", "1")).unwrap();
        f.store.save(&f.session, &record("a.com", "second", "2")).unwrap();

        let found = f.store.find(&f.session, "a.com").unwrap().unwrap();
        assert_eq!(found.username, "first");
        assert_eq!(found.password, "1");
        assert!(f.store.find(&f.session, "b.com").unwrap().is_none());
    }

    #[test]
    fn test_operations_require_ready_session() {
        let f = fixture(LoadPolicy::Lenient);
        let locked = VaultSession::new(&f.config);

        assert!(matches!(
            f.store.save(&locked, &record("a.com", "u", "pw")),
            Err(VaultError::SessionNotReady)
        ));
        assert!(matches!(
            f.store.list(&locked),
            Err(VaultError::SessionNotReady)
        ));
        assert!(matches!(
            f.store.find(&locked, "a.com"),
            Err(VaultError::SessionNotReady)
        ));
        assert!(matches!(
            f.store.delete(&locked, "a.com"),
            Err(VaultError::SessionNotReady)
        ));
        assert!(!f.config.collection_file_path.exists());
    }

    #[test]
    fn test_corrupt_collection_lenient_vs_strict() {
        let lenient = fixture(LoadPolicy::Lenient);
        std::fs::write(&lenient.config.collection_file_path, "[{oops").unwrap();
        assert!(lenient.store.list(&lenient.session).unwrap().is_empty());

        // Lenient save starts over from an empty collection
        lenient
            .store
            .save(&lenient.session, &record("a.com", "u", "pw"))
            .unwrap();
        assert_eq!(lenient.store.list(&lenient.session).unwrap().len(), 1);

        let strict = fixture(LoadPolicy::Strict);
        std::fs::write(&strict.config.collection_file_path, "[{oops").unwrap();
        assert!(matches!(
            strict.store.list(&strict.session),
            Err(VaultError::Corrupted(_))
        ));
        assert!(matches!(
            strict.store.save(&strict.session, &record("a.com", "u", "pw")),
            Err(VaultError::Corrupted(_))
        ));
    }

    #[test]
    fn test_corrupt_token_aborts_list_but_not_delete() {
        let f = fixture(LoadPolicy::Lenient);
        f.store.save(&f.session, &record("a.com", "u", "1")).unwrap();
        f.store.save(&f.session, &record("b.com", "u", "2")).unwrap();

        let mut stored = read_collection(&f.config.collection_file_path, LoadPolicy::Strict).unwrap();
        stored[1].password = "garbage".into();
        write_collection(&f.config.collection_file_path, &stored).unwrap();

        let err = f.store.list(&f.session).err().unwrap();
        match err {
            VaultError::Decryption(msg) => assert!(msg.contains("record 1 (b.com)")),
            other => panic!("unexpected error: {:?}", other),
        }

        // Decrypting a.com alone still works, and the bad record can be removed
        assert!(f.store.find(&f.session, "a.com").unwrap().is_some());
        assert_eq!(f.store.delete(&f.session, "b.com").unwrap(), 1);
        assert_eq!(f.store.list(&f.session).unwrap().len(), 1);
    }

    #[test]
    fn test_independent_sessions_do_not_share_keys() {
        let a = fixture(LoadPolicy::Lenient);
        let b = fixture(LoadPolicy::Lenient);
        a.store.save(&a.session, &record("a.com", "u", "pw")).unwrap();

        // Session b cannot read records sealed under session a's key
        assert!(matches!(
            a.store.list(&b.session),
            Err(VaultError::Decryption(_))
        ));
        assert_eq!(a.store.list(&a.session).unwrap().len(), 1);
    }
}
