use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, bail};

use crate::session::store::Persistence;
use crate::store::schema::{ProfileData, SessionData};

#[derive(Debug, Default)]
struct Inner {
    session: Option<SessionData>,
    profile: Option<ProfileData>,
    fail_writes: bool,
    writes: usize,
}

/// In-process persistence. Clones share the same contents, so a test can keep
/// a handle and inspect what the session store wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail, to exercise the best-effort write path.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    pub fn session(&self) -> Option<SessionData> {
        self.inner.borrow().session.clone()
    }

    fn write(&self, apply: impl FnOnce(&mut Inner)) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            bail!("memory store is read-only");
        }
        apply(&mut inner);
        inner.writes += 1;
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn load_session(&self) -> Option<SessionData> {
        self.inner.borrow().session.clone()
    }

    fn save_session(&self, data: &SessionData) -> Result<()> {
        self.write(|inner| inner.session = Some(data.clone()))
    }

    fn clear_session(&self) -> Result<()> {
        self.write(|inner| inner.session = None)
    }

    fn load_profile(&self) -> Option<ProfileData> {
        self.inner.borrow().profile.clone()
    }

    fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.write(|inner| inner.profile = Some(data.clone()))
    }
}
