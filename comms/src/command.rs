use serde::{Deserialize, Serialize};

/// Player Command for claiming a display name on the connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginCommand {
    // The display name to play under.
    #[serde(rename = "u")]
    pub username: String,
    // The origin the client was served from, checked against the allowed origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// Player Command for taking the host seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BecomeHostCommand {
    // The display name that should become the host.
    #[serde(rename = "u")]
    pub username: String,
}

/// Player Command for starting a new round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartGameCommand;

/// Host Command for picking the secret word out of the offered candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectWordCommand {
    // The picked word.
    #[serde(rename = "w")]
    pub word: String,
}

/// Host Command for revealing the emoji clues of the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEmojisCommand {
    // The clues, in the order they should be shown.
    #[serde(rename = "e")]
    pub emojis: Vec<String>,
}

/// Guesser Command for submitting a guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakeGuessCommand {
    pub guess: String,
}

/// Host Command for confirming the final clues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostReadyCommand {
    // The confirmed clues.
    #[serde(rename = "e")]
    pub emojis: Vec<String>,
}

/// Player Command for wiping scores and roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayAgainCommand;

/// Host Command for asking another set of candidate words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestNewWordsCommand;

/// Player Command for quitting the whole game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuitCommand;

/// A player command which can be sent to the server by a single connection.
/// All commands are processed in the context of the game room paired with the sending connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_ct", rename_all = "snake_case")]
pub enum UserCommand {
    Login(LoginCommand),
    BecomeHost(BecomeHostCommand),
    StartGame(StartGameCommand),
    #[serde(alias = "word_selected")]
    SelectWord(SelectWordCommand),
    SetEmojis(SetEmojisCommand),
    MakeGuess(MakeGuessCommand),
    HostReady(HostReadyCommand),
    PlayAgain(PlayAgainCommand),
    RequestNewWords(RequestNewWordsCommand),
    Quit(QuitCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    // given a command enum, and an expect string, asserts that command is serialized / deserialized appropiately
    fn assert_command_serialization(command: &UserCommand, expected: &str) {
        let serialized = serde_json::to_string(&command).unwrap();
        assert_eq!(serialized, expected);
        let deserialized: UserCommand = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, *command);
    }

    #[test]
    fn test_login_command() {
        let command = UserCommand::Login(LoginCommand {
            username: "alice".to_string(),
            origin: None,
        });

        assert_command_serialization(&command, r#"{"_ct":"login","u":"alice"}"#);
    }

    #[test]
    fn test_login_command_with_origin() {
        let command = UserCommand::Login(LoginCommand {
            username: "alice".to_string(),
            origin: Some("http://localhost:3000".to_string()),
        });

        assert_command_serialization(
            &command,
            r#"{"_ct":"login","u":"alice","origin":"http://localhost:3000"}"#,
        );
    }

    #[test]
    fn test_set_emojis_command() {
        let command = UserCommand::SetEmojis(SetEmojisCommand {
            emojis: vec!["🇫🇷".to_string(), "🥖".to_string()],
        });

        assert_command_serialization(&command, r#"{"_ct":"set_emojis","e":["🇫🇷","🥖"]}"#);
    }

    #[test]
    fn test_make_guess_command() {
        let command = UserCommand::MakeGuess(MakeGuessCommand {
            guess: "France".to_string(),
        });

        assert_command_serialization(&command, r#"{"_ct":"make_guess","guess":"France"}"#);
    }

    #[test]
    fn test_unit_commands() {
        assert_command_serialization(
            &UserCommand::StartGame(StartGameCommand),
            r#"{"_ct":"start_game"}"#,
        );
        assert_command_serialization(
            &UserCommand::RequestNewWords(RequestNewWordsCommand),
            r#"{"_ct":"request_new_words"}"#,
        );
        assert_command_serialization(&UserCommand::Quit(QuitCommand), r#"{"_ct":"quit"}"#);
    }

    #[test]
    fn test_word_selected_alias() {
        let command: UserCommand =
            serde_json::from_str(r#"{"_ct":"word_selected","w":"France"}"#).unwrap();

        assert_eq!(
            command,
            UserCommand::SelectWord(SelectWordCommand {
                word: "France".to_string()
            })
        );
    }
}
