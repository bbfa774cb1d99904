//! Compact action scripts such as `buy:sword;craft:normal*3;assign:1;stone:normal;enhance`.
use forgesim_game::{Action, CatalystTier, WeaponKind, parse_transfer};
use regex::Regex;
use serde_json::json;
use thiserror::Error;

const STEP_PATTERN: &str =
    r"^(?P<verb>[a-z]+)(?::(?P<arg>[A-Za-z0-9_]+))?(?:\*(?P<count>[0-9]+))?$";

/// Upper bound on a single step's repeat count.
pub const MAX_REPEAT: u32 = 10_000;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("step pattern failed to compile")]
    Pattern(#[from] regex::Error),
    #[error("step {index}: cannot parse `{step}`")]
    Syntax { index: usize, step: String },
    #[error("step {index}: unknown verb `{verb}`")]
    UnknownVerb { index: usize, verb: String },
    #[error("step {index}: `{verb}` needs an argument")]
    MissingArgument { index: usize, verb: &'static str },
    #[error("step {index}: `{verb}` takes no argument")]
    UnexpectedArgument { index: usize, verb: &'static str },
    #[error("step {index}: bad argument `{arg}`: {reason}")]
    BadArgument {
        index: usize,
        arg: String,
        reason: String,
    },
    #[error("step {index}: repeat count must be between 1 and {max}", max = MAX_REPEAT)]
    BadCount { index: usize },
    #[error("script contains no steps")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Buy,
    Craft,
    Assign,
    Stone,
    Enhance,
    Collect,
    Return,
    Reset,
}

impl Verb {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "buy" => Some(Self::Buy),
            "craft" => Some(Self::Craft),
            "assign" => Some(Self::Assign),
            "stone" => Some(Self::Stone),
            "enhance" => Some(Self::Enhance),
            "collect" => Some(Self::Collect),
            "return" => Some(Self::Return),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Craft => "craft",
            Self::Assign => "assign",
            Self::Stone => "stone",
            Self::Enhance => "enhance",
            Self::Collect => "collect",
            Self::Return => "return",
            Self::Reset => "reset",
        }
    }
}

/// One parsed step: an action and how many times to dispatch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    pub action: Action,
    pub count: u32,
}

/// Parse a `;`-separated script. Purchases are stamped with `created_at_ms`.
///
/// Item and catalyst assignments are routed through the transfer payload
/// decoder, so `assign:3`, `assign:bow_3` and `stone:supreme` accept exactly
/// what a drag-and-drop input layer would send.
pub fn parse_script(source: &str, created_at_ms: u64) -> Result<Vec<ScriptStep>, ScriptError> {
    let pattern = Regex::new(STEP_PATTERN)?;
    let mut steps = Vec::new();

    for (index, raw) in source
        .split(';')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .enumerate()
    {
        let index = index + 1;
        let caps = pattern.captures(raw).ok_or_else(|| ScriptError::Syntax {
            index,
            step: raw.to_string(),
        })?;
        let verb_raw = &caps["verb"];
        let verb = Verb::parse(verb_raw).ok_or_else(|| ScriptError::UnknownVerb {
            index,
            verb: verb_raw.to_string(),
        })?;
        let arg = caps.name("arg").map(|m| m.as_str());
        let count = match caps.name("count") {
            Some(m) => m
                .as_str()
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=MAX_REPEAT).contains(n))
                .ok_or(ScriptError::BadCount { index })?,
            None => 1,
        };
        let action = build_action(index, verb, arg, created_at_ms)?;
        steps.push(ScriptStep { action, count });
    }

    if steps.is_empty() {
        return Err(ScriptError::Empty);
    }
    Ok(steps)
}

/// Flatten steps into the dispatch order.
pub fn expand_steps(steps: &[ScriptStep]) -> Vec<Action> {
    steps
        .iter()
        .flat_map(|step| std::iter::repeat_n(step.action, step.count as usize))
        .collect()
}

fn build_action(
    index: usize,
    verb: Verb,
    arg: Option<&str>,
    created_at_ms: u64,
) -> Result<Action, ScriptError> {
    let bad = |arg: &str, reason: String| ScriptError::BadArgument {
        index,
        arg: arg.to_string(),
        reason,
    };
    let required = || {
        arg.ok_or(ScriptError::MissingArgument {
            index,
            verb: verb.as_str(),
        })
    };
    let no_arg = |action: Action| match arg {
        Some(_) => Err(ScriptError::UnexpectedArgument {
            index,
            verb: verb.as_str(),
        }),
        None => Ok(action),
    };

    match verb {
        Verb::Buy => {
            let kind = match arg {
                Some(raw) => raw
                    .parse::<WeaponKind>()
                    .map_err(|()| bad(raw, "unknown weapon kind".to_string()))?,
                None => WeaponKind::default(),
            };
            Ok(Action::PurchaseItem {
                kind,
                created_at_ms,
            })
        }
        Verb::Craft => {
            let raw = required()?;
            let tier = raw
                .parse::<CatalystTier>()
                .map_err(|()| bad(raw, "unknown catalyst tier".to_string()))?;
            Ok(Action::CraftCatalyst { tier })
        }
        Verb::Assign => {
            let raw = required()?;
            let payload = match raw.parse::<u64>() {
                Ok(id) => json!({ "item": id }),
                Err(_) => json!({ "item": raw }),
            };
            let assignment =
                parse_transfer(&payload.to_string()).map_err(|err| bad(raw, err.to_string()))?;
            Ok(Action::AssignSlot { assignment })
        }
        Verb::Stone => {
            let raw = required()?;
            let payload = json!({ "catalyst": raw });
            let assignment =
                parse_transfer(&payload.to_string()).map_err(|err| bad(raw, err.to_string()))?;
            Ok(Action::AssignSlot { assignment })
        }
        Verb::Enhance => no_arg(Action::Enhance),
        Verb::Collect => no_arg(Action::CollectResult),
        Verb::Return => no_arg(Action::ReturnActive),
        Verb::Reset => no_arg(Action::Reset),
    }
}
