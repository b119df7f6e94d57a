use serde::{Deserialize, Serialize};

/// A key press as reported by a keyboard source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPress {
    /// Key identity, e.g. `"space"`, `"a"`, `"num_5"`
    pub name: String,
    /// Seconds since the keyboard clock was last reset
    pub rt: f64,
}

impl KeyPress {
    pub fn new(name: impl Into<String>, rt: f64) -> Self {
        Self {
            name: name.into(),
            rt,
        }
    }
}

/// Pointer buttons, in the order sources report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Middle, MouseButton::Right];

    pub fn name(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventValue {
    Key(KeyPress),
    Button(MouseButton),
}

/// One captured input occurrence of a scene run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub value: EventValue,
    pub rt: f64,
}

impl Event {
    pub fn key(press: KeyPress) -> Self {
        let rt = press.rt;
        Self {
            value: EventValue::Key(press),
            rt,
        }
    }

    pub fn button(button: MouseButton, rt: f64) -> Self {
        Self {
            value: EventValue::Button(button),
            rt,
        }
    }

    /// Key name or button name of this event.
    pub fn label(&self) -> &str {
        match &self.value {
            EventValue::Key(press) => &press.name,
            EventValue::Button(button) => button.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_takes_rt_from_press() {
        let event = Event::key(KeyPress::new("space", 0.25));
        assert_eq!(event.rt, 0.25);
        assert_eq!(event.label(), "space");
    }

    #[test]
    fn buttons_serialize_by_name() {
        let event = Event::button(MouseButton::Middle, 1.5);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["value"], "middle");
        assert_eq!(json["rt"], 1.5);
    }
}
