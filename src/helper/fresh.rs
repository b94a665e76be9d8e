use std::time::Duration;

use tokio::time::sleep_until;
use tracing::info;

use crate::auth::AuthMethod;
use crate::cache::token::CachedToken;
use crate::helper::error::HelperError;
use crate::helper::exchange::exchange;
use crate::resilience::retry::RetrySettings;
use crate::sinks::TokenSink;
use crate::tasks::context::{CancelHandle, TaskContext};
use crate::tasks::done::DoneReceiver;
use crate::tasks::login_task::{self, LoginHandle};
use crate::tasks::sink_task::{self, SinkHandle};
use crate::vault::client::SecretStore;
use crate::vault::secret::Credentials;

/// Log in, persist the new token to every sink, then read the secret with it.
///
/// Login and persistence run as two tasks under one deadline. The call only
/// returns once both tasks have finished, and the secret is read only after
/// the token is durably stored.
pub async fn fresh_login<C, A, S>(
    client: &mut C,
    secret: &str,
    method: A,
    sinks: Vec<S>,
    timeout: Duration,
    retry: RetrySettings,
) -> Result<Credentials, HelperError>
where
    C: SecretStore,
    A: AuthMethod,
    S: TokenSink,
{
    let method_name = method.name().to_owned();
    let (cancel, ctx) = TaskContext::with_timeout(timeout);
    let deadline = ctx.deadline();

    let login = login_task::spawn(ctx.clone(), method, retry);
    let sink = sink_task::spawn(ctx, sinks);
    let LoginHandle { output: login_output, done: login_done } = login;
    let SinkHandle { input: sink_input, result: sink_result, done: sink_done } = sink;

    let tasks = RunningTasks { cancel, login_done, sink_done };

    let token: CachedToken = tokio::select! {
        _ = sleep_until(deadline) => {
            tasks.shutdown().await;
            return Err(HelperError::DeadlineExceeded { phase: "get token", timeout });
        }
        output = login_output => match output {
            Ok(Ok(token)) => token,
            Ok(Err(error)) => {
                tasks.shutdown().await;
                return Err(HelperError::Login { method: method_name, error });
            }
            // the task only drops the mailbox unanswered when the context is done
            Err(_) => {
                tasks.shutdown().await;
                return Err(HelperError::DeadlineExceeded { phase: "get token", timeout });
            }
        },
    };
    info!("auth method '{}': new token issued", method_name);

    if sink_input.send(token.clone()).is_err() {
        tasks.shutdown().await;
        return Err(HelperError::Persist(anyhow::anyhow!("sink writer exited before the token was handed over")));
    }

    let persisted = tokio::select! {
        _ = sleep_until(deadline) => Err(HelperError::DeadlineExceeded { phase: "write token to sink(s)", timeout }),
        result = sink_result => match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(HelperError::Persist(error)),
            Err(_) => Err(HelperError::DeadlineExceeded { phase: "write token to sink(s)", timeout }),
        },
    };
    tasks.shutdown().await;
    persisted?;
    info!("token written to sink(s)");

    client.set_token(&token.token);
    exchange(client, secret).await
}

struct RunningTasks {
    cancel: CancelHandle,
    login_done: DoneReceiver,
    sink_done: DoneReceiver,
}

impl RunningTasks {
    /// Cancel both tasks and wait for their completion signals.
    async fn shutdown(self) {
        self.cancel.cancel();
        self.login_done.wait().await;
        self.sink_done.wait().await;
    }
}
