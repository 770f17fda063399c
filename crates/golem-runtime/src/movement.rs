//! Movement coordination: the follow reconciliation loop, navigation
//! intents, and the `!find` lookup strategies.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use golem_client::session::{BlockQuery, GameSession, Pathfinder as _};
use golem_core::{Position, Result};

use crate::state::SharedState;

/// Period of the follow reconciliation tick.
pub(crate) const FOLLOW_TICK: Duration = Duration::from_secs(1);
/// Distance beyond which a follow tick issues a movement correction.
pub(crate) const FOLLOW_DISTANCE: f64 = 3.0;
/// Goal tolerance while following (stay close, not on top).
pub(crate) const FOLLOW_TOLERANCE: f64 = 2.0;
/// Goal tolerance for one-shot navigation (!home, !find).
pub(crate) const NAVIGATE_TOLERANCE: f64 = 1.0;
/// Duration of the degraded walk-forward nudge.
const NUDGE_DURATION: Duration = Duration::from_secs(1);
/// Side length of the randomized exploration spread around the bot.
const EXPLORE_SPREAD: f64 = 100.0;

/// Issue a navigation intent: a pathfinder goal when the collaborator is
/// present, otherwise the degraded look-and-announce fallback.
pub(crate) async fn navigate_to(
    session: &Arc<dyn GameSession>,
    pos: Position,
    tolerance: f64,
) -> Result<()> {
    if let Some(pathfinder) = session.pathfinder() {
        pathfinder.set_goal(pos, tolerance).await
    } else {
        session.look_at(pos).await?;
        session
            .send_chat(&format!("Heading to {}...", block_coords(pos)))
            .await
    }
}

/// Handle `!follow <target>`: verify the target is a connected player, then
/// spawn the reconciliation loop.
pub(crate) async fn start_follow(
    state: &SharedState,
    session: &Arc<dyn GameSession>,
    target: &str,
) -> Result<()> {
    if !session.players().await?.iter().any(|p| p == target) {
        return session
            .send_chat(&format!("Player {target} not found!"))
            .await;
    }

    let generation = state.lock().follow.start(target);
    session
        .send_chat(&format!("Now following {target}!"))
        .await?;

    tokio::spawn(follow_loop(
        Arc::clone(state),
        Arc::clone(session),
        target.to_string(),
        generation,
    ));
    Ok(())
}

/// Handle `!stop` (and the lost-sight transition): clear follow state and
/// any outstanding navigation goal.
pub(crate) async fn stop_follow(state: &SharedState, session: &Arc<dyn GameSession>) -> Result<()> {
    state.lock().follow.stop();
    if let Some(pathfinder) = session.pathfinder() {
        if let Err(e) = pathfinder.clear_goal().await {
            warn!(error = %e, "failed to clear navigation goal");
        }
    }
    session.send_chat("Stopped following.").await
}

/// Periodic reconciliation: once per second re-evaluate distance to the
/// followed player and correct course. Self-cancels when the generation
/// token moves on.
async fn follow_loop(
    state: SharedState,
    session: Arc<dyn GameSession>,
    target: String,
    generation: u64,
) {
    let mut tick = tokio::time::interval(FOLLOW_TICK);
    tick.tick().await; // consume the immediate first tick
    loop {
        tick.tick().await;

        if !state.lock().follow.is_current(generation, &target) {
            debug!(%target, "follow tick superseded, stopping");
            return;
        }

        let position = match session.player_position(&target).await {
            Ok(pos) => pos,
            Err(e) => {
                warn!(error = %e, "follow tick: position lookup failed");
                continue;
            }
        };

        let Some(position) = position else {
            let _ = session
                .send_chat(&format!("Lost sight of {target}!"))
                .await;
            if let Err(e) = stop_follow(&state, &session).await {
                warn!(error = %e, "failed to stop after losing sight");
            }
            return;
        };

        let own = match session.own_position().await {
            Ok(pos) => pos,
            Err(e) => {
                warn!(error = %e, "follow tick: own position lookup failed");
                continue;
            }
        };

        if own.distance_to(position) > FOLLOW_DISTANCE {
            if let Some(pathfinder) = session.pathfinder() {
                if let Err(e) = pathfinder.set_goal(position, FOLLOW_TOLERANCE).await {
                    warn!(error = %e, "follow tick: goal update failed");
                }
            } else {
                let _ = session.look_at(position).await;
                let _ = session.walk_forward(NUDGE_DURATION).await;
            }
        }
    }
}

/// Handle `!find <structure>`: dispatch to one of the fixed lookup
/// strategies.
pub(crate) async fn find_structure(
    state: &SharedState,
    session: &Arc<dyn GameSession>,
    structure: &str,
) -> Result<()> {
    session
        .send_chat(&format!("Searching for {structure}..."))
        .await?;
    state.lock().search_target = Some(structure.to_string());

    match structure {
        "village" => match session.nearest_entity("villager", 100.0).await? {
            Some(pos) => {
                session
                    .send_chat(&format!("Found villager at {}!", block_coords(pos)))
                    .await?;
                navigate_to(session, pos, NAVIGATE_TOLERANCE).await
            }
            None => {
                session
                    .send_chat("No village found nearby. Let me explore...")
                    .await?;
                explore_randomly(session).await
            }
        },
        "cave" | "mine" => {
            let query = BlockQuery::exact(["cave_air", "air"]);
            match session.nearest_block(&query, 50.0).await? {
                Some(pos) => {
                    session
                        .send_chat(&format!("Found cave entrance at {}!", block_coords(pos)))
                        .await?;
                    navigate_to(session, pos, NAVIGATE_TOLERANCE).await
                }
                None => {
                    session.send_chat("No caves found nearby. Exploring...").await?;
                    explore_randomly(session).await
                }
            }
        }
        "water" => {
            locate_block(
                session,
                BlockQuery::exact(["water"]),
                100.0,
                |at| format!("Found water at {at}!"),
                "No water found nearby.",
            )
            .await
        }
        "lava" => {
            locate_block(
                session,
                BlockQuery::exact(["lava"]),
                100.0,
                |at| format!("Found lava at {at}! Be careful!"),
                "No lava found nearby.",
            )
            .await
        }
        "tree" => {
            locate_block(
                session,
                BlockQuery::substring(["log", "wood"]),
                50.0,
                |at| format!("Found trees at {at}!"),
                "No trees found nearby.",
            )
            .await
        }
        "stone" => {
            locate_block(
                session,
                BlockQuery::exact(["stone", "cobblestone"]),
                30.0,
                |at| format!("Found stone at {at}!"),
                "No stone found nearby.",
            )
            .await
        }
        "iron" => locate_ore(session, "iron_ore").await,
        "coal" => locate_ore(session, "coal_ore").await,
        "diamond" => locate_ore(session, "diamond_ore").await,
        _ => {
            session
                .send_chat(&format!(
                    "Don't know how to find {structure}. Available: village, cave, mine, water, lava, tree, stone, iron, coal, diamond"
                ))
                .await
        }
    }
}

async fn locate_block(
    session: &Arc<dyn GameSession>,
    query: BlockQuery,
    radius: f64,
    found: impl Fn(String) -> String,
    missing: &str,
) -> Result<()> {
    match session.nearest_block(&query, radius).await? {
        Some(pos) => {
            session.send_chat(&found(block_coords(pos))).await?;
            navigate_to(session, pos, NAVIGATE_TOLERANCE).await
        }
        None => session.send_chat(missing).await,
    }
}

async fn locate_ore(session: &Arc<dyn GameSession>, ore: &str) -> Result<()> {
    locate_block(
        session,
        BlockQuery::exact([ore]),
        50.0,
        |at| format!("Found {ore} at {at}!"),
        &format!("No {ore} found nearby."),
    )
    .await
}

/// Pick a randomized exploration target around the bot and head there.
async fn explore_randomly(session: &Arc<dyn GameSession>) -> Result<()> {
    let own = session.own_position().await?;
    let target = Position::new(
        own.x + (rand::random::<f64>() - 0.5) * EXPLORE_SPREAD,
        own.y,
        own.z + (rand::random::<f64>() - 0.5) * EXPLORE_SPREAD,
    );
    session.send_chat("Exploring randomly...").await?;
    navigate_to(session, target, NAVIGATE_TOLERANCE).await
}

fn block_coords(pos: Position) -> String {
    format!(
        "{}, {}, {}",
        pos.x.floor() as i64,
        pos.y.floor() as i64,
        pos.z.floor() as i64
    )
}
