use std::{net::SocketAddr, time::Duration};

use comms::{
    command::{self, UserCommand},
    event::Event,
    transport::{
        self,
        client::{CommandWriter, EventStream},
    },
};
use emoji_guess_server::{config::Config, game::WordList};
use tokio::{
    io::AsyncWriteExt,
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
};
use tokio_stream::StreamExt;

struct Player {
    events: EventStream,
    commands: CommandWriter,
}

impl Player {
    async fn connect(addr: SocketAddr) -> Player {
        let tcp_stream = TcpStream::connect(addr)
            .await
            .expect("failed to connect to server");
        let (events, commands) = transport::client::split_tcp_stream(tcp_stream);

        Player { events, commands }
    }

    async fn send(&mut self, command: UserCommand) {
        self.commands.write(&command).await.unwrap();
    }

    async fn login(&mut self, name: &str, origin: Option<&str>) {
        self.send(UserCommand::Login(command::LoginCommand {
            username: name.into(),
            origin: origin.map(String::from),
        }))
        .await;
    }

    /// skips events until one matches, failing the test if none arrives in time
    async fn wait_for(&mut self, matches: impl Fn(&Event) -> bool) -> Event {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(3);

        loop {
            let next = tokio::time::timeout_at(deadline, self.events.next())
                .await
                .expect("timed out waiting for an event");

            match next {
                Some(Ok(event)) if matches(&event) => return event,
                Some(Ok(_)) => continue,
                Some(Err(e)) => panic!("could not parse event: {}", e),
                None => panic!("server closed the connection"),
            }
        }
    }
}

async fn start_server(words: &[&str]) -> (SocketAddr, oneshot::Sender<()>, JoinHandle<anyhow::Result<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind to the port");
    let addr = listener.local_addr().unwrap();
    let words = WordList::new(words.iter().map(|w| w.to_string()).collect()).unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(emoji_guess_server::serve(
        listener,
        Config::default(),
        words,
        async move {
            let _ = shutdown_rx.await;
        },
    ));

    (addr, shutdown_tx, server)
}

#[tokio::test]
async fn full_round_over_tcp() {
    let (addr, shutdown_tx, server) = start_server(&["France", "Spain", "Italy"]).await;

    let mut alice = Player::connect(addr).await;
    alice.login("Alice", Some("http://localhost:3000")).await;
    alice
        .wait_for(|e| matches!(e, Event::UpdatePlayers(p) if p.guessers == ["Alice"]))
        .await;
    alice
        .send(UserCommand::BecomeHost(command::BecomeHostCommand {
            username: "Alice".into(),
        }))
        .await;
    alice
        .wait_for(|e| matches!(e, Event::UpdatePlayers(p) if p.host.as_deref() == Some("Alice")))
        .await;

    let mut bob = Player::connect(addr).await;
    bob.login("Bob", None).await;
    bob.wait_for(|e| matches!(e, Event::UpdatePlayers(p) if p.guessers == ["Bob"]))
        .await;

    bob.send(UserCommand::StartGame(command::StartGameCommand)).await;
    let Event::WordOptions(options) = alice
        .wait_for(|e| matches!(e, Event::WordOptions(_)))
        .await
    else {
        unreachable!()
    };
    let mut offered = options.words.clone();
    offered.sort();
    assert_eq!(offered, vec!["France", "Italy", "Spain"]);
    bob.wait_for(|e| matches!(e, Event::GameStarted(_))).await;

    alice
        .send(UserCommand::SelectWord(command::SelectWordCommand {
            word: "France".into(),
        }))
        .await;
    bob.wait_for(|e| matches!(e, Event::GameMessage(_))).await;

    alice
        .send(UserCommand::SetEmojis(command::SetEmojisCommand {
            emojis: vec!["🇫🇷".into()],
        }))
        .await;
    bob.wait_for(|e| matches!(e, Event::GameState(s) if s.emojis == ["🇫🇷"]))
        .await;

    bob.send(UserCommand::MakeGuess(command::MakeGuessCommand {
        guess: "Spain".into(),
    }))
    .await;
    bob.wait_for(|e| matches!(e, Event::GuessResponse(_))).await;

    bob.send(UserCommand::MakeGuess(command::MakeGuessCommand {
        guess: " france ".into(),
    }))
    .await;
    let Event::CorrectGuess(correct) = alice
        .wait_for(|e| matches!(e, Event::CorrectGuess(_)))
        .await
    else {
        unreachable!()
    };
    assert_eq!(correct.winner, "Bob");
    assert_eq!(correct.word, "France");
    assert_eq!(correct.new_scores.get("Bob"), Some(&90));

    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn foreign_origin_and_garbage_are_answered_with_errors() {
    let (addr, shutdown_tx, server) = start_server(&["France", "Spain", "Italy"]).await;

    let mut mallory = Player::connect(addr).await;
    mallory.login("Mallory", Some("http://evil.example")).await;
    let rejected = mallory.wait_for(|e| matches!(e, Event::Error(_))).await;
    assert_eq!(rejected, Event::error("origin not allowed"));

    let mut raw = TcpStream::connect(addr).await.unwrap();
    raw.write_all(b"{\"_ct\":\"dance\"}\r\n").await.unwrap();
    let (mut raw_events, _raw_commands) = transport::client::split_tcp_stream(raw);
    let reply = tokio::time::timeout(Duration::from_secs(3), raw_events.next())
        .await
        .expect("timed out waiting for an event");
    assert!(matches!(reply, Some(Ok(Event::Error(_)))));

    // the session survives and the foreign login never reached the room
    mallory.login("Mallory", None).await;
    mallory
        .wait_for(|e| matches!(e, Event::UpdatePlayers(p) if p.guessers == ["Mallory"]))
        .await;

    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn reset_host_connection_frees_the_seat() {
    let (addr, shutdown_tx, server) = start_server(&["France", "Spain", "Italy"]).await;

    // a zero linger turns the drop below into a RST instead of a clean FIN
    let tcp_stream = TcpStream::connect(addr).await.unwrap();
    tcp_stream.set_linger(Some(Duration::ZERO)).unwrap();
    let (events, commands) = transport::client::split_tcp_stream(tcp_stream);
    let mut alice = Player { events, commands };
    alice.login("Alice", None).await;
    alice
        .send(UserCommand::BecomeHost(command::BecomeHostCommand {
            username: "Alice".into(),
        }))
        .await;
    alice
        .wait_for(|e| matches!(e, Event::UpdatePlayers(p) if p.host.as_deref() == Some("Alice")))
        .await;

    let mut bob = Player::connect(addr).await;
    bob.login("Bob", None).await;
    bob.wait_for(|e| {
        matches!(e, Event::UpdatePlayers(p) if p.host.as_deref() == Some("Alice") && p.guessers == ["Bob"])
    })
    .await;

    drop(alice);

    bob.wait_for(|e| matches!(e, Event::UpdatePlayers(p) if p.host.is_none() && p.guessers == ["Bob"]))
        .await;

    // the seat is free again
    bob.send(UserCommand::BecomeHost(command::BecomeHostCommand {
        username: "Bob".into(),
    }))
    .await;
    bob.wait_for(|e| matches!(e, Event::UpdatePlayers(p) if p.host.as_deref() == Some("Bob")))
        .await;

    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
