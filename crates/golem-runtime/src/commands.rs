//! Handlers for the structured chat commands.
//!
//! Each handler completes its state mutation before yielding and emits at
//! most one public chat response; `!follow` and `!find` additionally kick
//! off background work through the movement coordinator.

use std::sync::Arc;

use chrono::Local;

use golem_client::session::GameSession;
use golem_core::{Location, Result};
use golem_llm::gateway::ReplyGateway;

use crate::movement;
use crate::router::Command;
use crate::state::SharedState;

const HELP_TEXT: &str = "Available commands: !help, !ping, !time, !players, !follow <player>, \
                         !sethome, !base, !team <player>, !find <structure>, !stop, !home, \
                         !switch to [ai_model]";

pub(crate) async fn execute(
    state: &SharedState,
    gateway: &Arc<ReplyGateway>,
    session: &Arc<dyn GameSession>,
    command: Command,
) -> Result<()> {
    match command {
        Command::Help => session.send_chat(HELP_TEXT).await,

        Command::Ping => {
            let label = gateway.active().label().to_uppercase();
            session
                .send_chat(&format!("Pong! Using {label} model"))
                .await
        }

        Command::Time => {
            let now = Local::now().format("%Y-%m-%d %H:%M:%S");
            session.send_chat(&format!("Current time: {now}")).await
        }

        Command::Players => {
            let players = session.players().await?.join(", ");
            session
                .send_chat(&format!("Online players: {players}"))
                .await
        }

        Command::Follow { target } => movement::start_follow(state, session, &target).await,

        Command::Stop => movement::stop_follow(state, session).await,

        Command::SetHome => {
            let location = current_location(session).await?;
            session
                .send_chat(&format!("Home set at coordinates: {location}"))
                .await?;
            state.lock().home = Some(location);
            Ok(())
        }

        Command::Home => {
            let home = state.lock().home.clone();
            match home {
                None => {
                    session
                        .send_chat("No home location set! Use !sethome first.")
                        .await
                }
                Some(location) => {
                    session
                        .send_chat(&format!("Going home to {location}"))
                        .await?;
                    movement::navigate_to(
                        session,
                        location.position(),
                        movement::NAVIGATE_TOLERANCE,
                    )
                    .await
                }
            }
        }

        Command::SetBase => {
            let location = current_location(session).await?;
            session
                .send_chat(&format!("Base set at coordinates: {location}"))
                .await?;
            state.lock().base = Some(location);
            Ok(())
        }

        Command::Team { player } => {
            if session.players().await?.iter().any(|p| p == &player) {
                let size = {
                    let mut s = state.lock();
                    s.team.insert(player.clone());
                    s.team.len()
                };
                session
                    .send_chat(&format!("{player} added to team! Team size: {size}"))
                    .await
            } else {
                session
                    .send_chat(&format!("Player {player} not found!"))
                    .await
            }
        }

        Command::RemoveTeam { player } => {
            let remaining = {
                let mut s = state.lock();
                s.team.remove(&player).then(|| s.team.len())
            };
            match remaining {
                Some(size) => {
                    session
                        .send_chat(&format!("{player} removed from team! Team size: {size}"))
                        .await
                }
                None => {
                    session
                        .send_chat(&format!("{player} is not in the team!"))
                        .await
                }
            }
        }

        Command::TeamList => {
            let members: Vec<String> = state.lock().team.iter().cloned().collect();
            if members.is_empty() {
                session.send_chat("No team members yet!").await
            } else {
                session
                    .send_chat(&format!("Team members: {}", members.join(", ")))
                    .await
            }
        }

        Command::Find { structure } => movement::find_structure(state, session, &structure).await,
    }
}

async fn current_location(session: &Arc<dyn GameSession>) -> Result<Location> {
    let pos = session.own_position().await?;
    let dimension = session.dimension().await?;
    Ok(Location::from_position(pos, dimension))
}
