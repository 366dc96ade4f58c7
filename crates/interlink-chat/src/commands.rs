//! Prompt-prefix shortcuts.

use interlink_core::config::CommandConfig;

/// A predefined prompt prefix, selected by id (e.g. `/cornellformat`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    pub id: String,
    pub description: String,
    pub prompt_prefix: String,
}

impl CommandTemplate {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        prompt_prefix: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            prompt_prefix: prompt_prefix.into(),
        }
    }

    /// `prefix + "\n" + prompt`.
    pub fn apply(&self, prompt: &str) -> String {
        format!("{}\n{}", self.prompt_prefix, prompt)
    }
}

impl From<&CommandConfig> for CommandTemplate {
    fn from(config: &CommandConfig) -> Self {
        Self::new(&config.id, &config.description, &config.prompt_prefix)
    }
}

fn builtin_commands() -> Vec<CommandTemplate> {
    vec![
        CommandTemplate::new(
            "/weeklyflashcards",
            "Paste a list of human geography terms.",
            "With the following AP Human Geography vocabulary words, please created a list formatted as such...",
        ),
        CommandTemplate::new(
            "/cornellformat",
            "Paste your digital Biology notes.",
            "Please format the following text for Pre-AP Biology into Cornell Notes style...",
        ),
    ]
}

/// Immutable lookup table of commands, in registration order.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandTemplate>,
}

impl CommandRegistry {
    /// The built-in commands only.
    pub fn builtin() -> Self {
        Self {
            commands: builtin_commands(),
        }
    }

    /// Built-ins followed by configured extras. Built-in ids win on conflict,
    /// as does the first of several extras sharing an id.
    pub fn with_extras(extras: &[CommandConfig]) -> Self {
        let mut commands = builtin_commands();
        for extra in extras {
            if commands.iter().any(|c| c.id == extra.id) {
                tracing::warn!(id = %extra.id, "Ignoring duplicate command id");
                continue;
            }
            commands.push(CommandTemplate::from(extra));
        }
        Self { commands }
    }

    pub fn get(&self, id: &str) -> Option<&CommandTemplate> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandTemplate> {
        self.commands.iter()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
