use crossbeam_channel::Sender;
use std::io::BufRead;
use std::thread::JoinHandle;

use super::message::{Command, UiMessage};

/// Forward input lines to the session as commands. End of input counts as
/// `q`, so a closed stdin still ends the session and saves the playlist.
pub fn forward_commands(input: impl BufRead, tx: &Sender<UiMessage>) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Some(cmd) => {
                if tx.send(UiMessage::Command(cmd)).is_err() {
                    return;
                }
            }
            None => log::warn!("Unknown command: {}", line.trim()),
        }
    }
    log::debug!("Input closed, quitting");
    let _ = tx.send(UiMessage::Command(Command::Quit));
}

/// Read stdin on a detached thread. It ends with stdin or when the session
/// drops its queue.
pub fn spawn_stdin_reader(tx: Sender<UiMessage>) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("input".into())
        .spawn(move || forward_commands(std::io::stdin().lock(), &tx))
}
