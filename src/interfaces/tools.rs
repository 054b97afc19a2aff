//! The callable tools an agent runtime sees.
//!
//! Every tool replies with plain text, errors included, so the runtime can
//! relay the reply verbatim.

use crate::application::engine::{Penalty, RevolverEngine, TurnOutcome};
use crate::domain::game::{CHAMBER_COUNT, GroupId, UserId};
use crate::error::{GameError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const RELAY_VERBATIM: &str = "CRITICAL INSTRUCTION: When you receive the result from this tool, output it EXACTLY as given without any modification, rephrasing, or added commentary.";

const HOW_TO_START: &str =
    "💡 Use start_revolver_game to load the revolver (random bullets)\n💡 Pass `bullets` (1-6) to choose how many";

/// Name, description and JSON-schema parameters of a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: String,
    pub parameters: Value,
}

/// Who is calling, and from where.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// `None` (or id 0) outside a group chat.
    pub group_id: Option<GroupId>,
    pub user_id: UserId,
    pub user_name: Option<String>,
}

impl ToolContext {
    pub fn in_group(group_id: GroupId, user_id: UserId, user_name: impl Into<String>) -> Self {
        Self {
            group_id: Some(group_id),
            user_id,
            user_name: Some(user_name.into()),
        }
    }

    fn group(&self) -> Result<GroupId> {
        self.group_id
            .filter(|id| *id != 0)
            .ok_or(GameError::NotInGroup)
    }

    fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Player")
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn definition(&self) -> ToolDefinition;
    async fn run(&self, ctx: &ToolContext, args: Value) -> String;
}

fn parse_args<T: DeserializeOwned + Default>(args: Value) -> Result<T> {
    if args.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(args)?)
}

/// Renders a duration as e.g. `1h 5m`, `2m 30s` or `45s`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StartArgs {
    bullets: Option<i64>,
}

pub struct StartRevolverGameTool {
    engine: Arc<RevolverEngine>,
}

impl StartRevolverGameTool {
    pub fn new(engine: Arc<RevolverEngine>) -> Self {
        Self { engine }
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<String> {
        let group_id = ctx.group()?;
        let args: StartArgs = parse_args(args)?;
        // Negative counts become `None`; the engine randomizes anything outside 1..=6
        let bullets = args.bullets.and_then(|n| usize::try_from(n).ok());

        self.engine.start(group_id, bullets).await?;

        let name = ctx.display_name();
        Ok(format!(
            "🎯 {name} challenges fate!\n🔫 The cylinder spins and clicks into place.\n💀 Who dares to pull the trigger?"
        ))
    }
}

#[async_trait]
impl Tool for StartRevolverGameTool {
    fn name(&self) -> &'static str {
        "start_revolver_game"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: format!(
                "Start a new game of Russian Roulette. Use this when the user wants to play, start a new round, or play again. If the bullet count is not specified, a random number of bullets (1-{CHAMBER_COUNT}) is loaded.\n\n{RELAY_VERBATIM}"
            ),
            parameters: json!({
                "type": "object",
                "properties": {
                    "bullets": {
                        "type": "integer",
                        "description": "Number of bullets to load (1-6). If not provided, a random number is loaded.",
                        "minimum": 1,
                        "maximum": CHAMBER_COUNT,
                    }
                },
                "required": [],
            }),
        }
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> String {
        match self.execute(ctx, args).await {
            Ok(reply) => reply,
            Err(GameError::NotInGroup) => "❌ Group chats only".to_string(),
            Err(GameError::AlreadyRunning) => "💥 A game is still in progress!".to_string(),
            Err(e) => format!("❌ Failed to start game: {e}"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum JoinAction {
    #[default]
    Shoot,
    Join,
    Participate,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JoinArgs {
    action: JoinAction,
}

pub struct JoinRevolverGameTool {
    engine: Arc<RevolverEngine>,
}

impl JoinRevolverGameTool {
    pub fn new(engine: Arc<RevolverEngine>) -> Self {
        Self { engine }
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<String> {
        let group_id = ctx.group()?;
        let args: JoinArgs = parse_args(args)?;
        debug!(group_id, action = ?args.action, "join requested");

        let report = self.engine.take_turn(group_id, ctx.user_id).await?;

        let name = ctx.display_name();
        let mut reply = match report.outcome {
            TurnOutcome::Hit(Penalty::Banned(duration)) => format!(
                "💥 Bang! {name} takes the bullet.\n🔇 Muted for {}",
                format_duration(duration)
            ),
            TurnOutcome::Hit(Penalty::Immune) => {
                format!("💥 {name} got shot!\n⚠️ Admins and owners are immune!")
            }
            TurnOutcome::Hit(Penalty::Failed) => {
                format!("💥 {name} got shot!\n⚠️ Mute failed!")
            }
            TurnOutcome::Miss => format!("😅 *click* {name} survives this round."),
        };
        if report.game_over {
            reply.push_str("\n🏁 The cylinder is empty, game over!");
        }
        Ok(reply)
    }
}

#[async_trait]
impl Tool for JoinRevolverGameTool {
    fn name(&self) -> &'static str {
        "join_revolver_game"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: format!(
                "Join the current Russian Roulette game by pulling the trigger. Use this when the user says 'I want to play', 'me too', 'shoot', or wants to participate in an ongoing game.\n\n{RELAY_VERBATIM}"
            ),
            parameters: json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "description": "The user's action in the game. Defaults to 'shoot'.",
                        "enum": ["shoot", "join", "participate"],
                    }
                },
                "required": [],
            }),
        }
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> String {
        match self.execute(ctx, args).await {
            Ok(reply) => reply,
            Err(GameError::NotInGroup) => "❌ Group chats only".to_string(),
            Err(GameError::NoGame) => format!("⚠️ No game running\n{HOW_TO_START}"),
            Err(e) => format!("❌ Failed to join game: {e}"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatusArgs {
    detailed: bool,
}

pub struct CheckRevolverStatusTool {
    engine: Arc<RevolverEngine>,
}

impl CheckRevolverStatusTool {
    pub fn new(engine: Arc<RevolverEngine>) -> Self {
        Self { engine }
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<String> {
        let group_id = ctx.group()?;
        let args: StatusArgs = parse_args(args)?;

        let status = self.engine.status(group_id).await?;

        let danger = if status.current_loaded {
            "🔴 Danger"
        } else {
            "🟢 Safe"
        };
        let mut reply = format!(
            "🔫 Revolver status\n📊 Remaining: {} bullet(s)\n🎯 Chamber {}\n{danger}",
            status.remaining, status.chamber
        );
        if args.detailed {
            reply.push_str(&format!(
                "\n🔄 Turns taken: {}\n⏱️ Running for {}",
                status.turns,
                format_duration(status.elapsed)
            ));
        }
        Ok(reply)
    }
}

#[async_trait]
impl Tool for CheckRevolverStatusTool {
    fn name(&self) -> &'static str {
        "check_revolver_status"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: format!(
                "Check the current status of the Russian Roulette game. Use this when the user asks about the game status or the remaining bullets.\n\n{RELAY_VERBATIM}"
            ),
            parameters: json!({
                "type": "object",
                "properties": {
                    "detailed": {
                        "type": "boolean",
                        "description": "Whether to include turns taken and elapsed time. Defaults to false.",
                    }
                },
                "required": [],
            }),
        }
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> String {
        match self.execute(ctx, args).await {
            Ok(reply) => reply,
            Err(GameError::NotInGroup) => "❌ Group chats only".to_string(),
            Err(GameError::NoGame) => format!("🔍 No game running\n{HOW_TO_START}"),
            Err(e) => format!("❌ Failed to check status: {e}"),
        }
    }
}

/// Looks tools up by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the three revolver tools, all backed by `engine`.
    pub fn revolver(engine: Arc<RevolverEngine>) -> Self {
        let mut registry = Self::new();
        registry.register(StartRevolverGameTool::new(Arc::clone(&engine)));
        registry.register(JoinRevolverGameTool::new(Arc::clone(&engine)));
        registry.register(CheckRevolverStatusTool::new(engine));
        registry
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.push(Box::new(tool));
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    pub async fn dispatch(&self, name: &str, ctx: &ToolContext, args: Value) -> Result<String> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| GameError::UnknownTool(name.to_string()))?;
        Ok(tool.run(ctx, args).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m");
        assert_eq!(format_duration(Duration::from_secs(150)), "2m 30s");
        assert_eq!(format_duration(Duration::from_secs(3900)), "1h 5m");
    }

    #[test]
    fn test_parse_args_accepts_null_and_partial_objects() {
        let args: StatusArgs = parse_args(Value::Null).unwrap();
        assert!(!args.detailed);

        let args: JoinArgs = parse_args(json!({})).unwrap();
        assert_eq!(args.action, JoinAction::Shoot);

        let args: JoinArgs = parse_args(json!({ "action": "participate" })).unwrap();
        assert_eq!(args.action, JoinAction::Participate);
    }

    #[test]
    fn test_parse_args_rejects_bad_types() {
        let result: Result<StartArgs> = parse_args(json!({ "bullets": "three" }));
        assert!(matches!(result, Err(GameError::InvalidArguments(_))));

        let result: Result<JoinArgs> = parse_args(json!({ "action": "dance" }));
        assert!(matches!(result, Err(GameError::InvalidArguments(_))));
    }

    #[test]
    fn test_display_name_falls_back() {
        let ctx = ToolContext {
            group_id: Some(1),
            user_id: 1,
            user_name: Some(String::new()),
        };
        assert_eq!(ctx.display_name(), "Player");
        assert_eq!(ToolContext::in_group(1, 1, "Ana").display_name(), "Ana");
    }

    #[test]
    fn test_group_zero_is_not_a_group() {
        let ctx = ToolContext::in_group(0, 1, "Ana");
        assert!(matches!(ctx.group(), Err(GameError::NotInGroup)));
        assert_eq!(ToolContext::in_group(5, 1, "Ana").group().unwrap(), 5);
    }
}
