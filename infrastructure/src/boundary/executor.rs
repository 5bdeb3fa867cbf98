//! Subprocess boundary executor
//!
//! One child process per call, no pool. Credentials reach the child through
//! its environment block only; argv carries the operation and its arguments.
//! The child is killed if the call times out, is cancelled, or its future is
//! dropped.

use async_trait::async_trait;
use rhmcp_application::ports::boundary_executor::{BoundaryExecutor, CallContext};
use rhmcp_domain::core::string::clip;
use rhmcp_domain::{API_KEY_ENV, BoundaryCallSpec, BridgeError, Credential, PRIVATE_KEY_ENV};
use serde_json::Value;
use std::borrow::Cow;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Default wall-clock budget per call
pub const DEFAULT_BOUNDARY_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest stderr excerpt carried in an error
const MAX_STDERR: usize = 4096;

/// Longest stdout excerpt carried in a parse error
const MAX_RAW_OUTPUT: usize = 1024;

/// Runs each [`BoundaryCallSpec`] in a fresh child process.
pub struct SubprocessExecutor {
    program: String,
    prefix_args: Vec<String>,
    env: Vec<(String, String)>,
    credential: Arc<Credential>,
    timeout: Duration,
}

impl SubprocessExecutor {
    pub fn new(program: impl Into<String>, credential: Arc<Credential>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
            env: Vec::new(),
            credential,
            timeout: DEFAULT_BOUNDARY_TIMEOUT,
        }
    }

    /// Arguments placed before `<group> <operation> ...`.
    pub fn with_prefix_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Extra (non-secret) environment for the child.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The configured credential, with the transport's API key if it sent one.
    fn credential_for(&self, ctx: &CallContext) -> Cow<'_, Credential> {
        match ctx.api_key.as_deref() {
            Some(api_key) => Cow::Owned(self.credential.with_api_key(api_key)),
            None => Cow::Borrowed(self.credential.as_ref()),
        }
    }

    fn command(&self, spec: &BoundaryCallSpec, ctx: &CallContext) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args)
            .args(spec.to_argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        // Only what this call is entitled to; never inherited values.
        cmd.env_remove(API_KEY_ENV).env_remove(PRIVATE_KEY_ENV);
        let credential = self.credential_for(ctx);
        if let Some(api_key) = credential.api_key() {
            cmd.env(API_KEY_ENV, api_key);
        }
        if let Some(key) = credential.signing_key() {
            cmd.env(PRIVATE_KEY_ENV, key.expose());
        }

        // Linux: request kernel to send SIGTERM to child when parent dies.
        // This catches cases where kill_on_drop can't run (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        cmd
    }

    /// Mask any credential material a child echoed to stderr.
    fn redact(&self, text: &str, ctx: &CallContext) -> String {
        let secrets = [
            self.credential.signing_key().map(|k| k.expose()),
            self.credential.api_key(),
            ctx.api_key.as_deref(),
        ];
        secrets
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .fold(text.to_string(), |acc, secret| acc.replace(secret, "***"))
    }
}

#[async_trait]
impl BoundaryExecutor for SubprocessExecutor {
    async fn invoke(&self, spec: BoundaryCallSpec, ctx: &CallContext) -> Result<Value, BridgeError> {
        let name = spec.qualified_name();
        let started = Instant::now();
        debug!("Spawning boundary call {} via {}", name, self.program);

        let child = self.command(&spec, ctx).spawn().map_err(|e| {
            warn!("Failed to spawn boundary process {}: {}", self.program, e);
            BridgeError::BoundaryProcess {
                exit_code: None,
                stderr: format!("failed to spawn {}: {}", self.program, e),
            }
        })?;

        // Dropping `child` (via the wait future) on timeout or cancel kills it.
        let output = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                debug!("Boundary call {} cancelled", name);
                return Err(BridgeError::Cancelled);
            }
            result = tokio::time::timeout(self.timeout, child.wait_with_output()) => match result {
                Err(_) => {
                    warn!("Boundary call {} timed out after {:?}", name, self.timeout);
                    return Err(BridgeError::BoundaryTimeout(self.timeout));
                }
                Ok(Err(e)) => {
                    return Err(BridgeError::BoundaryProcess {
                        exit_code: None,
                        stderr: format!("failed to collect output: {}", e),
                    });
                }
                Ok(Ok(output)) => output,
            },
        };

        debug!(
            "Boundary call {} exited with {} in {}ms",
            name,
            output.status,
            started.elapsed().as_millis()
        );

        if !output.status.success() {
            let stderr = self.redact(String::from_utf8_lossy(&output.stderr).trim(), ctx);
            return Err(BridgeError::BoundaryProcess {
                exit_code: output.status.code(),
                stderr: clip(&stderr, MAX_STDERR),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(stdout.trim()).map_err(|e| BridgeError::BoundaryParse {
            message: e.to_string(),
            raw: clip(&self.redact(&stdout, ctx), MAX_RAW_OUTPUT),
        })
    }
}
