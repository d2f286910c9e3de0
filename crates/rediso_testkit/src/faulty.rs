//! Fault injection for backing-store commands.
//!
//! [`FaultyStore`] wraps any [`HashStore`] and fails chosen commands with
//! [`StorageError::CommandFailed`], so tests can stop a multi-key write at a
//! precise step and inspect what was left behind.

use parking_lot::Mutex;
use rediso_storage::{HashStore, StorageError, StorageResult};
use std::collections::HashMap;

/// Message carried by every injected failure.
pub const INJECTED_FAULT: &str = "injected fault";

#[derive(Debug)]
struct Fault {
    command: &'static str,
    skip: usize,
    sticky: bool,
}

#[derive(Debug, Default)]
struct State {
    calls: HashMap<&'static str, usize>,
    faults: Vec<Fault>,
}

/// A [`HashStore`] wrapper that fails selected commands.
///
/// Command names are upper-case Redis spellings: `HGET`, `HSET`, `HDEL`,
/// `HGETALL`, `HLEN`, `EXISTS`, `RENAME`, `KEYS`, `AUTH`, `SELECT`, `PING`.
/// A failed command does not reach the wrapped store.
#[derive(Debug)]
pub struct FaultyStore<S> {
    inner: S,
    state: Mutex<State>,
}

impl<S: HashStore> FaultyStore<S> {
    /// Wraps `inner` with no faults armed.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: Mutex::new(State::default()),
        }
    }

    /// Fails the next call of `command` after letting `skip` calls through.
    /// The fault disarms after firing once.
    pub fn fail_on(&mut self, command: &'static str, skip: usize) {
        self.state.lock().faults.push(Fault {
            command,
            skip,
            sticky: false,
        });
    }

    /// Fails every call of `command` from now on.
    pub fn fail_always(&mut self, command: &'static str) {
        self.state.lock().faults.push(Fault {
            command,
            skip: 0,
            sticky: true,
        });
    }

    /// Disarms every fault.
    pub fn heal(&mut self) {
        self.state.lock().faults.clear();
    }

    /// Returns how many times `command` was issued, failed calls included.
    pub fn calls(&self, command: &str) -> usize {
        self.state.lock().calls.get(command).copied().unwrap_or(0)
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwraps the store.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn intercept(&self, command: &'static str) -> StorageResult<()> {
        let mut state = self.state.lock();
        *state.calls.entry(command).or_insert(0) += 1;

        let Some(pos) = state.faults.iter().position(|f| f.command == command) else {
            return Ok(());
        };
        let fault = &mut state.faults[pos];
        if fault.skip > 0 {
            fault.skip -= 1;
            return Ok(());
        }
        if !fault.sticky {
            state.faults.remove(pos);
        }
        Err(StorageError::command_failed(command, INJECTED_FAULT))
    }
}

impl<S: HashStore> HashStore for FaultyStore<S> {
    fn hget(&self, key: &str, field: &str) -> StorageResult<Option<String>> {
        self.intercept("HGET")?;
        self.inner.hget(key, field)
    }

    fn hset(&mut self, key: &str, field: &str, value: &str) -> StorageResult<bool> {
        self.intercept("HSET")?;
        self.inner.hset(key, field, value)
    }

    fn hdel(&mut self, key: &str, field: &str) -> StorageResult<u64> {
        self.intercept("HDEL")?;
        self.inner.hdel(key, field)
    }

    fn hgetall(&self, key: &str) -> StorageResult<Vec<(String, String)>> {
        self.intercept("HGETALL")?;
        self.inner.hgetall(key)
    }

    fn hlen(&self, key: &str) -> StorageResult<u64> {
        self.intercept("HLEN")?;
        self.inner.hlen(key)
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        self.intercept("EXISTS")?;
        self.inner.exists(key)
    }

    fn rename(&mut self, from: &str, to: &str) -> StorageResult<()> {
        self.intercept("RENAME")?;
        self.inner.rename(from, to)
    }

    fn keys(&self, pattern: &str) -> StorageResult<Vec<String>> {
        self.intercept("KEYS")?;
        self.inner.keys(pattern)
    }

    fn auth(&mut self, password: &str) -> StorageResult<()> {
        self.intercept("AUTH")?;
        self.inner.auth(password)
    }

    fn select(&mut self, database: u32) -> StorageResult<()> {
        self.intercept("SELECT")?;
        self.inner.select(database)
    }

    fn ping(&self) -> StorageResult<()> {
        self.intercept("PING")?;
        self.inner.ping()
    }
}
