// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::time::DateTime;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Context provides the environment and the clock used while signing.
///
/// ## Important
///
/// Signing itself never touches process-wide state directly. Environment
/// variables are only read through the configured [`Env`], and the current
/// time is only read through the configured [`Clock`].
///
/// By default the environment is empty ([`NoopEnv`]) and the clock is the
/// system clock ([`SystemClock`]).
///
/// ## Example
///
/// ```
/// use amzsign_core::{Context, FixedClock, OsEnv};
///
/// let ctx = Context::new()
///     .with_env(OsEnv)
///     .with_clock(FixedClock::new(amzsign_core::time::now()));
/// ```
#[derive(Clone)]
pub struct Context {
    env: Arc<dyn Env>,
    clock: Arc<dyn Clock>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("env", &self.env)
            .field("clock", &self.clock)
            .finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context with an empty environment and the system clock.
    pub fn new() -> Self {
        Self {
            env: Arc::new(NoopEnv),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the environment implementation.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Replace the clock implementation.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Get the environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    /// Read the current time from the configured clock.
    #[inline]
    pub fn now(&self) -> Result<DateTime> {
        self.clock.now()
    }
}

/// Env abstracts the access to environment variables.
pub trait Env: Debug + Send + Sync + 'static {
    /// Get an environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    fn var(&self, key: &str) -> Option<String>;
}

/// Implements Env for the OS context.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }
}

/// StaticEnv provides a static env environment.
///
/// This is useful for testing or for providing a fixed environment.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// The environment variables to use.
    pub envs: HashMap<String, String>,
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }
}

/// NoopEnv is an environment without any variables.
///
/// This is used when no environment is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnv;

impl Env for NoopEnv {
    fn var(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Clock is the only source of the signing time.
///
/// A failing clock makes signing fail: every signature must carry a timestamp.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Read the current time.
    fn now(&self) -> Result<DateTime>;
}

/// SystemClock reads the wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime> {
        let now = SystemTime::now();
        now.duration_since(UNIX_EPOCH).map_err(|e| {
            Error::clock_unavailable("system time is before unix epoch").with_source(e)
        })?;

        Ok(DateTime::from(now))
    }
}

/// FixedClock always returns the same instant.
///
/// Use it to make signatures reproducible in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime);

impl FixedClock {
    /// Create a clock frozen at `time`.
    pub fn new(time: DateTime) -> Self {
        Self(time)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Result<DateTime> {
        Ok(self.0)
    }
}
