use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fmt, fs, path::Path, str::FromStr};

#[derive(Debug, Deserialize)]
struct CommandScriptFile {
    steps: Vec<CommandScriptStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommandScriptStepDef {
    command: String,
}

/// One step the headless runner can perform against a board session.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Refresh,
    Toggle,
    /// Click the first clickable actor with this name (a post id or a control name).
    Click(String),
    /// Cast a ray along -z from `(x, y, 1)` and click whatever it hits.
    ClickAt { x: f32, y: f32 },
    /// Block until every earlier step is handled and no refresh is pending.
    Wait,
    /// Log the scene tree.
    Dump,
}

impl FromStr for ScriptCommand {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        let mut parts = input.split_whitespace();
        let Some(verb) = parts.next() else {
            bail!("empty command");
        };
        let args: Vec<&str> = parts.collect();

        let command = match (verb, args.as_slice()) {
            ("refresh", []) => Self::Refresh,
            ("toggle", []) => Self::Toggle,
            ("wait", []) => Self::Wait,
            ("dump", []) => Self::Dump,
            ("click", [name]) => Self::Click((*name).to_string()),
            ("click-at", [x, y]) => Self::ClickAt {
                x: x.parse().with_context(|| format!("invalid x coordinate {x:?}"))?,
                y: y.parse().with_context(|| format!("invalid y coordinate {y:?}"))?,
            },
            ("refresh" | "toggle" | "wait" | "dump" | "click" | "click-at", _) => {
                bail!("wrong number of arguments for {verb:?}")
            }
            _ => bail!("unknown command {verb:?}"),
        };
        Ok(command)
    }
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refresh => write!(f, "refresh"),
            Self::Toggle => write!(f, "toggle"),
            Self::Click(name) => write!(f, "click {name}"),
            Self::ClickAt { x, y } => write!(f, "click-at {x} {y}"),
            Self::Wait => write!(f, "wait"),
            Self::Dump => write!(f, "dump"),
        }
    }
}

/// Ordered list of commands for a headless session.
///
/// Scripts are JSON of the form `{"steps": [{"command": "..."}]}`; every
/// command is parsed up front so a typo fails before the session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandScript {
    steps: Vec<ScriptCommand>,
}

impl CommandScript {
    /// Load a command script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read command script {}", path.display()))?;
        Self::from_str(&contents)
            .with_context(|| format!("invalid command script {}", path.display()))
    }

    /// Load a command script from an in-memory JSON string.
    pub fn from_str(contents: &str) -> Result<Self> {
        let file: CommandScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            bail!("command script contains no steps");
        }

        let steps = file
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                step.command
                    .trim()
                    .parse::<ScriptCommand>()
                    .with_context(|| format!("step {}", index + 1))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps })
    }

    /// Script used when none is given: let the first load finish, then show the scene.
    pub fn default_session() -> Self {
        Self {
            steps: vec![ScriptCommand::Wait, ScriptCommand::Dump],
        }
    }

    pub fn steps(&self) -> &[ScriptCommand] {
        &self.steps
    }
}
