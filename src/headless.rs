use crate::command_script::{CommandScript, ScriptCommand};
use crate::config::BoardConfig;
use anyhow::{Context, Result};
use glam::Vec3;
use postboard_board::{
    BoardController, BoardSession, FilePostSource, HttpPostSource, PostSource, SessionHandle,
};
use postboard_ui3d::{SharedScene, UserId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub struct HeadlessConfig {
    pub board: BoardConfig,
    /// Read posts from this JSON file instead of the HTTP API.
    pub posts_file: Option<PathBuf>,
    pub script: CommandScript,
    /// User attributed with every scripted click.
    pub user: UserId,
}

/// Run one board session against an in-memory scene, driven by a command script.
pub async fn run(cfg: HeadlessConfig) -> Result<()> {
    let source: Arc<dyn PostSource> = match &cfg.posts_file {
        Some(path) => {
            info!(path = %path.display(), "Reading posts from file");
            Arc::new(FilePostSource::new(path.clone()))
        }
        None => {
            let source =
                HttpPostSource::new(&cfg.board.api).context("failed to build HTTP client")?;
            info!(url = source.url(), section = %cfg.board.api.section, "Reading posts from API");
            Arc::new(source)
        }
    };

    let scene = SharedScene::default();
    let controller = BoardController::new(scene.clone(), cfg.board.layout.clone());
    let (session, mut handle) = BoardSession::new(controller, source, cfg.board.api.timeout());
    let session = tokio::spawn(session.run());

    let mut result = Ok(());
    for command in cfg.script.steps() {
        info!(%command, "Script step");
        result = execute(command, &scene, &mut handle, &cfg.user)
            .await
            .with_context(|| format!("script step {command:?} failed"));
        if result.is_err() {
            break;
        }
    }

    if handle.shutdown().await.is_err() {
        warn!("Board session already stopped");
    }
    session.await.context("board session task failed")?;

    let delivered = scene.lock().take_messages();
    info!(messages = delivered.len(), "Headless session finished");
    result
}

async fn execute(
    command: &ScriptCommand,
    scene: &SharedScene,
    handle: &mut SessionHandle,
    user: &UserId,
) -> Result<()> {
    match command {
        ScriptCommand::Refresh => handle.refresh().await?,
        ScriptCommand::Toggle => handle.toggle_background().await?,
        ScriptCommand::Click(name) => {
            let click = {
                let scene = scene.lock();
                scene
                    .find_by_name(name)
                    .into_iter()
                    .find_map(|actor| scene.click(actor, user))
            };
            match click {
                Some(click) => handle.click(click).await?,
                None => warn!(%name, "No clickable actor with that name"),
            }
        }
        ScriptCommand::ClickAt { x, y } => {
            let origin = Vec3::new(*x, *y, 1.0);
            let click = scene.lock().click_at(origin, Vec3::NEG_Z, user);
            match click {
                Some(click) => handle.click(click).await?,
                None => warn!(x, y, "Click hit nothing"),
            }
        }
        ScriptCommand::Wait => {
            let snapshot = handle.wait_idle().await?;
            info!(
                generation = snapshot.generation,
                posts = snapshot.posts,
                background_visible = snapshot.background_visible,
                error = snapshot.last_error.as_deref().unwrap_or("none"),
                "Board idle"
            );
        }
        ScriptCommand::Dump => {
            let tree = scene.lock().describe();
            info!("Scene:\n{tree}");
        }
    }
    Ok(())
}
