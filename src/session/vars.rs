//! Named session fields shared between the form steps.

use std::fmt;
use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::models::UserData;
use crate::session::context::SessionContext;
use crate::session::error::SessionError;

/// A session key bound to the type stored under it
pub struct SessionVar<T> {
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SessionVar<T> {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    pub const fn key(&self) -> &'static str {
        self.key
    }
}

impl<T: Serialize + DeserializeOwned> SessionVar<T> {
    pub fn get(&self, session: &SessionContext) -> Result<Option<T>, SessionError> {
        session.get(self.key)
    }

    pub fn set(&self, session: &SessionContext, value: &T) -> Result<(), SessionError> {
        session.set(self.key, value)
    }
}

impl<T> fmt::Debug for SessionVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionVar").field(&self.key).finish()
    }
}

/// First name entered on the Start step
pub const FIRST_NAME: SessionVar<String> = SessionVar::new("FirstName");

/// Full record submitted on the Detail step
pub const USER_DATA_VALUES: SessionVar<UserData> = SessionVar::new("UserDataValues");
