use std::fmt;
use std::str::FromStr;

use crate::error::SceneError;
use crate::event::MouseButton;

/// A recognised listener name.
///
/// Grammar: `scene_(setup|drawn|frame)`, `mouse_(left|middle|right)`,
/// `key_any`, or `key_[num_]<token>` where the token is one ASCII digit or
/// one or more lowercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventName {
    SceneSetup,
    SceneDrawn,
    SceneFrame,
    Mouse(MouseButton),
    KeyAny,
    Key(String),
}

impl EventName {
    pub fn parse(name: &str) -> Result<Self, SceneError> {
        let invalid = || SceneError::InvalidEventName(name.to_string());

        if let Some(rest) = name.strip_prefix("scene_") {
            return match rest {
                "setup" => Ok(EventName::SceneSetup),
                "drawn" => Ok(EventName::SceneDrawn),
                "frame" => Ok(EventName::SceneFrame),
                _ => Err(invalid()),
            };
        }
        if let Some(rest) = name.strip_prefix("mouse_") {
            return MouseButton::ALL
                .into_iter()
                .find(|b| b.name() == rest)
                .map(EventName::Mouse)
                .ok_or_else(invalid);
        }
        if let Some(rest) = name.strip_prefix("key_") {
            if rest == "any" {
                return Ok(EventName::KeyAny);
            }
            let token = rest.strip_prefix("num_").unwrap_or(rest);
            return if is_key_token(token) {
                Ok(EventName::Key(rest.to_string()))
            } else {
                Err(invalid())
            };
        }
        Err(invalid())
    }

    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            EventName::SceneSetup | EventName::SceneDrawn | EventName::SceneFrame
        )
    }
}

fn is_key_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    match bytes {
        [] => false,
        [single] if single.is_ascii_digit() => true,
        _ => bytes.iter().all(u8::is_ascii_lowercase),
    }
}

impl FromStr for EventName {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventName::parse(s)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventName::SceneSetup => f.write_str("scene_setup"),
            EventName::SceneDrawn => f.write_str("scene_drawn"),
            EventName::SceneFrame => f.write_str("scene_frame"),
            EventName::Mouse(button) => write!(f, "mouse_{}", button.name()),
            EventName::KeyAny => f.write_str("key_any"),
            EventName::Key(key) => write!(f, "key_{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_recognised_names() {
        for name in [
            "scene_setup",
            "scene_drawn",
            "scene_frame",
            "mouse_left",
            "mouse_middle",
            "mouse_right",
            "key_any",
            "key_a",
            "key_space",
            "key_escape",
            "key_5",
            "key_num_5",
            "key_num_enter",
        ] {
            let parsed = EventName::parse(name).unwrap();
            assert_eq!(parsed.to_string(), name);
        }
    }

    #[test]
    fn rejects_everything_else() {
        for name in [
            "",
            "scene_",
            "scene_close",
            "mouse_wheel",
            "key_",
            "key_num_",
            "key_12",
            "key_f1",
            "key_F",
            "key_Space",
            "key_a-b",
            "on_key_space",
            "keyspace",
        ] {
            assert!(
                matches!(EventName::parse(name), Err(SceneError::InvalidEventName(n)) if n == name),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn lifecycle_names_are_flagged() {
        assert!(EventName::SceneFrame.is_lifecycle());
        assert!(!EventName::KeyAny.is_lifecycle());
        assert_eq!(
            "mouse_right".parse::<EventName>().unwrap(),
            EventName::Mouse(MouseButton::Right)
        );
    }
}
