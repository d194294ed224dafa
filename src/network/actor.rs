//! Network actor - runs backend calls in the Tokio runtime, one task per command

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::ApiClient;

/// Network actor that turns commands into backend calls
pub struct NetworkActor {
    client: ApiClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: ApiClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => break,
                        Some(cmd) => self.dispatch(cmd),
                    }
                }

                // Reap finished tasks; each task reports its own result
                Some(_result) = self.active_requests.join_next() => {}
            }
        }

        // Outstanding calls are dropped; nobody is left to apply their results
        self.active_requests.abort_all();
    }

    fn dispatch(&mut self, cmd: NetworkCommand) {
        let client = self.client.clone();
        let response_tx = self.response_tx.clone();

        match cmd {
            NetworkCommand::Login { id, username, password } => {
                self.active_requests.spawn(async move {
                    tracing::info!(id, username = %username, "Logging in");
                    let result = client.login(&username, &password).await;
                    match &result {
                        Ok(_) => tracing::info!(id, "Login succeeded"),
                        Err(e) => tracing::info!(id, kind = e.kind(), error = %e, "Login failed"),
                    }
                    let _ = response_tx.send(NetworkResponse::LoginCompleted { id, result });
                });
            }

            NetworkCommand::Logout { credential } => {
                self.active_requests.spawn(async move {
                    tracing::info!("Logging out");
                    client.logout(credential.as_ref()).await;
                });
            }

            NetworkCommand::ListUsers { id, credential } => {
                self.active_requests.spawn(async move {
                    tracing::info!(id, "Fetching users");
                    let result = client.list_users(credential.as_ref()).await;
                    match &result {
                        Ok(users) => tracing::info!(id, count = users.len(), "Users fetched"),
                        Err(e) => tracing::warn!(id, kind = e.kind(), error = %e, "Fetching users failed"),
                    }
                    let _ = response_tx.send(NetworkResponse::UsersLoaded { id, result });
                });
            }

            NetworkCommand::DeleteUser { id, user_id, credential } => {
                self.active_requests.spawn(async move {
                    tracing::info!(id, user_id, "Deleting user");
                    let result = client.delete_user(user_id, credential.as_ref()).await;
                    if let Err(e) = &result {
                        tracing::warn!(id, user_id, kind = e.kind(), error = %e, "Delete failed");
                    }
                    let _ = response_tx.send(NetworkResponse::UserDeleted { id, user_id, result });
                });
            }

            NetworkCommand::FetchAvatar { id, user, credential } => {
                self.active_requests.spawn(async move {
                    let result = match user.avatar_path() {
                        Some(path) => {
                            tracing::info!(id, user_id = user.id, path, "Fetching avatar");
                            let fetched = client.fetch_avatar(path, credential.as_ref()).await;
                            if let Err(e) = &fetched {
                                tracing::warn!(id, user_id = user.id, kind = e.kind(), error = %e, "Avatar unavailable");
                            }
                            fetched.map(|avatar| Some(Arc::new(avatar)))
                        }
                        None => Ok(None),
                    };
                    let _ = response_tx.send(NetworkResponse::AvatarLoaded { id, user, result });
                });
            }

            NetworkCommand::Shutdown => {}
        }
    }
}
