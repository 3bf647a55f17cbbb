use std::{future::Future, sync::Arc};

use tokio::{net::TcpListener, sync::broadcast, task::JoinSet};
use tracing::{info, warn};

use crate::{
    config::Config,
    game::{GameRoom, WordList},
    gateway::GameGateway,
    session,
};

/// Accepts players on the listener until `shutdown` resolves, then waits for every session to end
pub async fn serve(
    listener: TcpListener,
    config: Config,
    words: WordList,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let mut join_set: JoinSet<anyhow::Result<()>> = JoinSet::new();
    let config = Arc::new(config);
    let (gateway, gateway_task) = GameGateway::start(GameRoom::new(words));
    let (quit_tx, quit_rx) = broadcast::channel::<()>(1);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("server interrupted, gracefully shutting down");
                // no receivers left just means no session is running
                let _ = quit_tx.send(());
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((socket, addr)) => {
                    info!(%addr, "accepted connection");
                    join_set.spawn(session::handle_player_session(
                        gateway.clone(),
                        config.clone(),
                        quit_rx.resubscribe(),
                        socket,
                    ));
                }
                Err(e) => warn!(error = %e, "failed to accept connection"),
            },
            Some(finished) = join_set.join_next() => log_session_end(finished),
        }
    }

    while let Some(finished) = join_set.join_next().await {
        log_session_end(finished);
    }

    // every session dropped its handle, the gateway task winds down on its own
    drop(gateway);
    gateway_task.await?;
    info!("server shut down");

    Ok(())
}

fn log_session_end(finished: Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match finished {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "session ended with an error"),
        Err(e) => warn!(error = %e, "session task failed"),
    }
}
