//! Rule database lifecycle
//!
//! A [`RuleSession`] owns the in-memory rule table together with the file it
//! was loaded from. Changes are flushed by [`RuleSession::save`] or
//! [`RuleSession::close`]; anything still unsaved when the session is dropped
//! is written out then, so early returns and error paths persist too.

use crate::fingerprint::Fingerprinter;
use crate::rules::{AlignedStatements, Rule, RuleDatabase};
use crate::Result;
use std::path::{Path, PathBuf};

/// Owns the rule database for the lifetime of a run
#[derive(Debug)]
pub struct RuleSession {
    db: RuleDatabase,
    path: PathBuf,
    dirty: bool,
}

impl RuleSession {
    /// Load the database at `path`, or bootstrap a fresh one if the file
    /// does not exist yet
    pub fn open<P: AsRef<Path>>(path: P, fingerprinter: &dyn Fingerprinter) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            let db = RuleDatabase::load(&path)?;
            Ok(Self {
                db,
                path,
                dirty: false,
            })
        } else {
            log::info!(
                "No rule set at {}, starting from built-in rules",
                path.display()
            );
            Ok(Self {
                db: RuleDatabase::bootstrap(fingerprinter)?,
                path,
                dirty: true,
            })
        }
    }

    pub fn database(&self) -> &RuleDatabase {
        &self.db
    }

    /// Mutable access; the session is marked as needing a flush
    pub fn database_mut(&mut self) -> &mut RuleDatabase {
        self.dirty = true;
        &mut self.db
    }

    /// Learn a rule and mark the session for flushing
    pub fn add_rule(
        &mut self,
        statements: &AlignedStatements,
        name: &str,
        fingerprinter: &dyn Fingerprinter,
    ) -> Result<&Rule> {
        self.dirty = true;
        self.db.add_rule(statements, name, fingerprinter)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check for changes not yet written to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the database to its file
    pub fn save(&mut self) -> Result<()> {
        self.db.save(&self.path)?;
        self.dirty = false;
        Ok(())
    }

    /// Save and end the session, surfacing any write error
    pub fn close(mut self) -> Result<()> {
        self.save()
    }
}

impl Drop for RuleSession {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.db.save(&self.path) {
                log::error!("Failed to save rule set to {}: {}", self.path.display(), e);
            }
        }
    }
}
